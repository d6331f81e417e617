//! Active-user filtering
//!
//! A user is active when their last sign-in is at or after `now - 30 days`.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Earliest sign-in that still counts as active.
pub fn active_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(ACTIVE_WINDOW_DAYS * 24)
}

/// Read `last_sign_in_at`, which may be epoch milliseconds or an RFC 3339 string.
pub fn last_sign_in(user: &Value) -> Option<DateTime<Utc>> {
    match user.get("last_sign_in_at")? {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(s) => {
            if let Ok(millis) = s.trim().parse::<i64>() {
                return DateTime::from_timestamp_millis(millis);
            }
            DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

pub fn is_active(user: &Value, cutoff: DateTime<Utc>) -> bool {
    last_sign_in(user).is_some_and(|signed_in| signed_in >= cutoff)
}

pub fn count_active(users: &[Value], now: DateTime<Utc>) -> usize {
    let cutoff = active_cutoff(now);
    users.iter().filter(|user| is_active(user, cutoff)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn user_at(ts: DateTime<Utc>) -> Value {
        json!({ "id": "user_x", "last_sign_in_at": ts.timestamp_millis() })
    }

    #[test]
    fn boundary_is_inclusive() {
        let now = fixed_now();
        let cutoff = active_cutoff(now);

        assert!(is_active(&user_at(now - Duration::days(30)), cutoff));
        assert!(is_active(&user_at(now - Duration::days(29)), cutoff));
        assert!(!is_active(&user_at(now - Duration::days(31)), cutoff));
    }

    #[test]
    fn one_millisecond_past_the_window_is_inactive() {
        let now = fixed_now();
        let just_outside = now - Duration::days(30) - Duration::milliseconds(1);
        assert!(!is_active(&user_at(just_outside), active_cutoff(now)));
    }

    #[test]
    fn counts_mixed_users() {
        let now = fixed_now();
        let users = vec![
            user_at(now - Duration::days(1)),
            user_at(now - Duration::days(30)),
            user_at(now - Duration::days(35)),
            json!({ "id": "never", "last_sign_in_at": null }),
            json!({ "id": "missing" }),
        ];
        assert_eq!(count_active(&users, now), 2);
    }

    #[test]
    fn accepts_string_timestamps() {
        let now = fixed_now();
        let cutoff = active_cutoff(now);

        let rfc = json!({ "last_sign_in_at": "2024-06-01T08:30:00Z" });
        let millis = json!({ "last_sign_in_at": (now - Duration::days(2)).timestamp_millis().to_string() });
        let stale = json!({ "last_sign_in_at": "2024-04-01T00:00:00+02:00" });
        let garbage = json!({ "last_sign_in_at": "yesterday" });

        assert!(is_active(&rfc, cutoff));
        assert!(is_active(&millis, cutoff));
        assert!(!is_active(&stale, cutoff));
        assert!(!is_active(&garbage, cutoff));
    }

    #[test]
    fn empty_list_counts_zero() {
        assert_eq!(count_active(&[], fixed_now()), 0);
    }
}
