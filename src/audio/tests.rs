use super::types::{seek_target, volume_to_gain};
use std::time::Duration;

#[test]
fn volume_maps_percent_to_gain_and_clamps() {
    assert_eq!(volume_to_gain(0), 0.0);
    assert_eq!(volume_to_gain(50), 0.5);
    assert_eq!(volume_to_gain(100), 1.0);
    assert_eq!(volume_to_gain(250), 1.0);
}

#[test]
fn seek_target_moves_by_whole_seconds_and_stops_at_zero() {
    let at = Duration::from_millis(12_700);
    assert_eq!(seek_target(at, 5), Duration::from_secs(17));
    assert_eq!(seek_target(at, -5), Duration::from_secs(7));
    assert_eq!(seek_target(at, -60), Duration::ZERO);
}
