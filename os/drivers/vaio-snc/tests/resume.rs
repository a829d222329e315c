mod common;

use common::{Firmware, Shared};
use vaio_firmware::{Method, Payload};
use vaio_snc::features::RadioKind;
use vaio_snc::{Config, LifecycleState};

fn machine() -> Shared {
    Shared::new(
        Firmware::with_handles(&[0x0149, 0x0153, 0x0105])
            .answer(0x0149, 0x0000, 3)
            .answer(0x0153, 0x0100, 1)
            .method(b"ECON", 0),
    )
}

#[test]
fn suspend_marks_features() {
    let shared = machine();
    let device = shared.attach(Config::default());
    assert_eq!(device.feature_state("fan"), Some(LifecycleState::Active));
    assert_eq!(device.feature_state("rfkill"), Some(LifecycleState::Unsupported));

    device.on_suspend();
    assert_eq!(device.feature_state("fan"), Some(LifecycleState::Suspended));
    assert_eq!(device.feature_state("rfkill"), Some(LifecycleState::Unsupported));
    // still readable while suspended
    assert_eq!(device.read_attribute("fan_speeds").as_deref(), Ok("3"));

    device.on_resume();
    assert_eq!(device.feature_state("fan"), Some(LifecycleState::Active));
}

#[test]
fn resume_reenables_then_reapplies() {
    let shared = machine();
    let device = shared.attach(Config::default());
    device.write_attribute("fan_control", "2").unwrap();
    device.write_attribute("kbd_backlight", "1").unwrap();
    device.write_attribute("touchpad", "1").unwrap();

    device.on_suspend();
    shared.clear_calls();
    device.on_resume();

    let calls = shared.with(|fw| fw.calls.clone());
    assert_eq!(calls[0], (Method::ECON, Payload::Integer(1)));
    assert_eq!(calls[1], (Method::SN02, Payload::Integer(0xffff)));
    assert_eq!(
        shared.handle_calls(),
        vec![
            (0x0149, 0x0002_0200),
            (0x0153, 0x0001_4000),
            (0x0105, 0x0100),
        ]
    );
}

#[test]
fn resume_does_not_redetect() {
    let shared = machine();
    let device = shared.attach(Config::default());
    device.on_suspend();
    shared.clear_calls();
    device.on_resume();

    let lookups = shared.with(|fw| fw.args_of(Method::SN00));
    assert!(lookups.is_empty());
    // only the keyboard backlight restores unconditionally
    assert!(shared.handle_calls().iter().all(|&(cap, _)| cap == 0x0153));
}

#[test]
fn failed_reapply_keeps_feature_active() {
    let shared = machine();
    let device = shared.attach(Config::default());
    device.write_attribute("fan_control", "1").unwrap();
    device.on_suspend();
    shared.with(|fw| fw.failing.push(Method::SN07));

    device.on_resume();
    assert_eq!(device.feature_state("fan"), Some(LifecycleState::Active));
    shared.with(|fw| fw.failing.clear());
    assert_eq!(device.read_attribute("fan_speeds").as_deref(), Ok("3"));
}

#[test]
fn resume_skips_wwan_without_battery() {
    let shared = Shared::new(
        Firmware::with_handles(&[0x0124])
            .answer(0x0124, 0x0b00, 0x05)
            .answer(0x0124, 0x0200, 0b11)
            .answer(0x0124, 0x0300, 2)
            .answer(0x0124, 0x0700, 2),
    );
    let device = shared.attach(Config::default());
    device.set_radio_block(RadioKind::Wifi, true).unwrap();

    device.on_suspend();
    shared.with(|fw| {
        fw.answers.insert((0x0124, 0x0200), 0b01);
    });
    shared.clear_calls();
    device.on_resume();

    assert_eq!(
        shared.handle_calls(),
        vec![(0x0124, 0x0200), (0x0124, 0x0400)]
    );
    let wifi = device.radio_state(RadioKind::Wifi).unwrap();
    assert!(wifi.soft_blocked);
}

#[test]
fn detach_disables_notifications_and_releases() {
    let shared = machine();
    let device = shared.attach(Config::default());
    shared.clear_calls();
    device.detach();

    let calls = shared.with(|fw| fw.calls.clone());
    assert_eq!(calls[0], (Method::SN03, Payload::Integer(0xffff)));
    assert_eq!(
        shared.handle_calls(),
        vec![(0x0153, 0x0001_4000), (0x0153, 0x4200)]
    );
}

#[test]
fn platform_only_machine_skips_notification_setup() {
    let shared = Shared::new(Firmware::with_handles(&[]).link(b"SBRT", b"GBRT"));
    let device = shared.attach(Config::default());
    device.set_brightness(4).unwrap();
    device.on_suspend();
    shared.clear_calls();
    device.on_resume();

    assert!(shared.with(|fw| fw.args_of(Method::SN02)).is_empty());
    assert_eq!(shared.with(|fw| fw.args_of(Method::SBRT)), vec![Some(5)]);
}

#[test]
fn als_level_is_replayed_unless_firmware_managed() {
    let shared = Shared::new(Firmware::with_handles(&[0x0137]).answer(0x0137, 0x0000, 0x0008_0101));
    let device = shared.attach(Config::default());
    device.write_attribute("als_backlight", "5").unwrap();

    device.on_suspend();
    shared.clear_calls();
    device.on_resume();
    assert_eq!(shared.handle_calls(), vec![(0x0137, 0x0005_0600)]);

    device.write_attribute("als_managed", "1").unwrap();
    device.on_suspend();
    shared.clear_calls();
    device.on_resume();
    assert_eq!(shared.handle_calls(), vec![(0x0137, 0x0001_0300)]);
}
