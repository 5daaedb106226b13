use super::*;

#[test]
fn mmss_formats_minutes_and_seconds() {
    assert_eq!(format_mmss(Duration::from_millis(15_900)), "00:15");
    assert_eq!(format_mmss(Duration::from_secs(125)), "02:05");
}

#[test]
fn controls_text_uses_configured_steps() {
    let text = controls_text(&ControlsSettings {
        scrub_seconds: 10,
        volume_step: 3,
    });
    assert!(text.contains("[H/L] scrub -/+10s"));
    assert!(text.contains("[+/-] volume ±3"));
    assert!(text.starts_with("[i] edit prompt"));
    assert!(text.ends_with("[q] quit"));
}

#[test]
fn tags_are_numbered_from_one() {
    let tags = vec!["piano".to_string(), "violin".to_string()];
    assert_eq!(tags_text(&tags), "[1] piano  [2] violin");
    assert_eq!(tags_text(&[]), "");
}

#[test]
fn popup_stays_inside_area() {
    let area = Rect::new(0, 0, 30, 8);
    let popup = centered_rect_sized(48, 5, area);
    assert!(popup.width <= 28);
    assert!(popup.x + popup.width <= area.width);
    assert!(popup.y + popup.height <= area.height);
}
