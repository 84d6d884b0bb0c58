mod adaptation_events;
