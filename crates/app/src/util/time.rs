use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::config::WindowParams;
use crate::error::{AppError, Result};
use adoption_core::TimeRange;

pub const DEFAULT_WINDOW: &str = "last30days";

pub fn resolve_window(params: &WindowParams) -> Result<TimeRange> {
    if let (Some(start), Some(end)) = (params.start.clone(), params.end.clone()) {
        let start = normalize_rfc3339_to_utc(&start)?;
        let end = normalize_rfc3339_to_utc(&end)?;
        return Ok(TimeRange { start, end });
    }
    if let Some(start) = params.start.clone() {
        let start = normalize_rfc3339_to_utc(&start)?;
        let end = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        return Ok(TimeRange { start, end });
    }
    let now_local = Local::now();
    let (start_local, end_local) = match params.window.as_deref().unwrap_or(DEFAULT_WINDOW) {
        "today" => {
            let start = Local
                .with_ymd_and_hms(
                    now_local.year(),
                    now_local.month(),
                    now_local.day(),
                    0,
                    0,
                    0,
                )
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        "last7days" => {
            let start = now_local - Duration::days(7);
            (start, now_local)
        }
        "last14days" => {
            let start = now_local - Duration::days(14);
            (start, now_local)
        }
        "last30days" => {
            let start = now_local - Duration::days(30);
            (start, now_local)
        }
        "thismonth" => {
            let start = Local
                .with_ymd_and_hms(now_local.year(), now_local.month(), 1, 0, 0, 0)
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        "alltime" => {
            let start = Local
                .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        value => {
            return Err(AppError::InvalidInput(format!(
                "unsupported window {}",
                value
            )));
        }
    };
    let start = start_local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let end = end_local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(TimeRange { start, end })
}

pub fn normalize_rfc3339_to_utc(value: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|err| AppError::InvalidInput(format!("invalid datetime: {}", err)))?;
    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// UTC calendar date of the window's exclusive end, used as "today" when
/// deriving days-since-last-active.
pub fn window_end_date(window: &TimeRange) -> Result<NaiveDate> {
    let end = DateTime::parse_from_rfc3339(&window.end)?;
    Ok(end.with_timezone(&Utc).date_naive())
}

/// Whole days spanned by the window, never negative.
pub fn window_length_days(window: &TimeRange) -> Result<u32> {
    let start = DateTime::parse_from_rfc3339(&window.start)?
        .with_timezone(&Utc)
        .date_naive();
    let end = DateTime::parse_from_rfc3339(&window.end)?
        .with_timezone(&Utc)
        .date_naive();
    Ok((end - start).num_days().max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bounds_are_normalized_to_utc() {
        let params = WindowParams {
            window: None,
            start: Some("2026-07-01T02:00:00+02:00".to_string()),
            end: Some("2026-08-01T00:00:00Z".to_string()),
        };
        let window = resolve_window(&params).expect("window");
        assert_eq!(window.start, "2026-07-01T00:00:00.000Z");
        assert_eq!(window.end, "2026-08-01T00:00:00.000Z");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let params = WindowParams {
            window: Some("fortnight".to_string()),
            start: None,
            end: None,
        };
        let err = resolve_window(&params).expect_err("unsupported window");
        assert!(err.to_string().contains("unsupported window"));
    }

    #[test]
    fn named_presets_resolve() {
        for preset in ["today", "last7days", "last14days", "last30days", "thismonth", "alltime"] {
            let params = WindowParams {
                window: Some(preset.to_string()),
                start: None,
                end: None,
            };
            let window = resolve_window(&params).expect(preset);
            assert!(window.start <= window.end);
        }
    }

    #[test]
    fn window_end_date_is_utc_calendar_day() {
        let window = TimeRange {
            start: "2026-07-01T00:00:00Z".to_string(),
            end: "2026-07-31T23:59:00Z".to_string(),
        };
        let date = window_end_date(&window).expect("end date");
        assert_eq!(date.to_string(), "2026-07-31");
    }

    #[test]
    fn window_length_counts_whole_days() {
        let window = TimeRange {
            start: "2026-07-01T00:00:00Z".to_string(),
            end: "2026-07-31T00:00:00Z".to_string(),
        };
        assert_eq!(window_length_days(&window).expect("length"), 30);
    }
}
