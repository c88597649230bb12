#![no_main]
use libfuzzer_sys::fuzz_target;
use protocol_sim::topic::TopicFilter;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let filter = TopicFilter::new(s);

        let _ = filter.validate();
        assert_eq!(filter.levels().count() as u32, filter.level_count());
    }
});
