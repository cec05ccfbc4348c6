include!(concat!(env!("OUT_DIR"), "/status_messages.rs"));
