//! Fuzz target for line parsing and dispatch.
//!
//! Feeds arbitrary lines through the parser and, when they parse, through
//! the dispatcher. Neither may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::dispatch::dispatch;
use slirc_client::{Message, SessionState};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    if input.len() > 8191 {
        return;
    }

    let state = SessionState::new("me");
    dispatch(&state, &Message::parse(":me!u@h JOIN #x").unwrap());
    for line in input.split('\n') {
        if let Ok(msg) = Message::parse(line) {
            assert!(msg.params.len() <= slirc_client::message::MAX_MIDDLE_PARAMS);
            let _ = dispatch(&state, &msg);
        }
    }
});
