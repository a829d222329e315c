use vaio_snc::events::InputReport;
use vaio_snc::{EventTableId, Notification, SonyEvent, decode};

#[test]
fn every_table_decodes_something() {
    for id in EventTableId::ALL {
        let found = (0..=u8::MAX).filter_map(|raw| decode(id, raw)).count();
        assert!(found > 0, "{id:?} decodes nothing");
    }
}

#[test]
fn direct_path_matches_event_numbers() {
    for raw in 1..=u8::MAX {
        if let Some(event) = decode(EventTableId::Legacy, raw) {
            assert_eq!(event.code(), raw);
        }
    }
}

#[test]
fn key_reports_keep_the_event_number_as_scancode() {
    for raw in 1..=u8::MAX {
        let Some(event) = SonyEvent::from_code(raw) else {
            continue;
        };
        if let Notification::Key {
            input: Some(InputReport::Key { scancode, .. }),
            ..
        } = Notification::key(event)
        {
            assert_eq!(scancode, raw);
        }
    }
}
