#![no_main]
use libfuzzer_sys::fuzz_target;
use protocol_sim::topic::matches;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (topic, filter) = s.split_at(s.find('\n').unwrap_or(s.len()));

        let _ = matches(topic, filter);
        assert!(matches(topic, "#"));

        if !topic.contains(|c| c == '+' || c == '#') {
            assert!(matches(topic, topic));
        }
    }
});
