use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parse_iso_date() {
    let today = day(2024, 6, 1);
    assert_eq!(parse_date("2024-03-15", today).unwrap(), day(2024, 3, 15));
    assert_eq!(parse_date(" 2024-03-15 ", today).unwrap(), day(2024, 3, 15));
}

#[test]
fn parse_relative_spans() {
    let today = day(2024, 6, 1);
    assert_eq!(parse_date("30d", today).unwrap(), day(2024, 5, 2));
    assert_eq!(parse_date("1m", today).unwrap(), day(2024, 5, 2));
    assert_eq!(parse_date("1y", today).unwrap(), day(2023, 6, 2));
    assert_eq!(parse_date("0d", today).unwrap(), today);
}

#[test]
fn parse_date_errors() {
    let today = day(2024, 6, 1);
    assert!(parse_date("", today).is_err());
    assert!(parse_date("yesterday", today).is_err());
    assert!(parse_date("5w", today).is_err());
    assert!(parse_date("2024-13-01", today).is_err());
    assert!(parse_date("99999999999y", today).is_err());
}

#[test]
fn window_defaults_until_to_today() {
    let today = day(2024, 6, 1);
    let w = DateWindow::parse_at("2024-05-01", None, today).unwrap();
    assert_eq!(w.since, day(2024, 5, 1));
    assert_eq!(w.until, today);
    assert_eq!(w.to_string(), "2024-05-01..2024-06-01");
}

#[test]
fn window_rejects_reversed_range() {
    let today = day(2024, 6, 1);
    let err = DateWindow::parse_at("2024-05-10", Some("2024-05-01"), today).unwrap_err();
    assert!(err.to_string().contains("after"), "got: {err}");
}

#[test]
fn window_single_day_is_valid() {
    let today = day(2024, 6, 1);
    let w = DateWindow::parse_at("2024-05-10", Some("2024-05-10"), today).unwrap();
    assert_eq!(w.since, w.until);
}

#[test]
fn pr_numbers_list_and_ranges() {
    assert_eq!(parse_pr_numbers("12").unwrap(), vec![12]);
    assert_eq!(parse_pr_numbers("12, 15,#20").unwrap(), vec![12, 15, 20]);
    assert_eq!(parse_pr_numbers("3-5,1").unwrap(), vec![3, 4, 5, 1]);
    assert_eq!(parse_pr_numbers("4,3-5,4").unwrap(), vec![4, 3, 5]);
}

#[test]
fn pr_numbers_errors() {
    assert!(parse_pr_numbers("").is_err());
    assert!(parse_pr_numbers(" , ").is_err());
    assert!(parse_pr_numbers("abc").is_err());
    assert!(parse_pr_numbers("0").is_err());
    assert!(parse_pr_numbers("9-3").is_err());
    assert!(parse_pr_numbers("1-").is_err());
}

#[test]
fn pr_numbers_range_is_bounded() {
    let widest = parse_pr_numbers("1-1000").unwrap();
    assert_eq!(widest.len(), MAX_PR_RANGE as usize);
    assert_eq!(widest.last(), Some(&1000));

    let err = parse_pr_numbers("12,1-1000000").unwrap_err().to_string();
    assert!(err.contains("too large"), "{err}");
    assert!(err.contains("1-1000000"), "{err}");
    assert!(parse_pr_numbers("5-1005").is_err());
}

#[test]
fn pr_numbers_overlapping_ranges_stay_unique() {
    let numbers = parse_pr_numbers("1-1000,500-1500").unwrap();
    assert_eq!(numbers.len(), 1500);
    assert_eq!(numbers[1000], 1001);
}
