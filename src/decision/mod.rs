//! The "is this new data" rule that gates posting.
//!
//! The bot keeps no state of its own between cycles (it runs in a throwaway
//! container). Instead it infers "have I already posted this day's data?"
//! from the creation timestamp of the most recent post on the feed:
//!
//! - the dataset carried by a post is always from the day before the post
//!   went out (the source publishes with a one-day lag), so the last posted
//!   dataset date is `created_at - 1 day`, truncated to midnight;
//! - a strictly newer snapshot date means there is something to say.
//!
//! This also behaves correctly across weekends and other gaps with no
//! dataset update: the snapshot date simply fails to advance and the cycle
//! skips.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Decide whether the current snapshot warrants a new post.
///
/// `force` bypasses the check entirely (test and dry-run paths). A missing
/// `last_post_created_at` means the feed has never been posted to, which is
/// always a go-ahead.
pub fn should_post(
    as_of_date: NaiveDate,
    last_post_created_at: Option<DateTime<Utc>>,
    force: bool,
) -> bool {
    if force {
        return true;
    }
    let Some(created_at) = last_post_created_at else {
        return true;
    };

    let last_dataset_date = (created_at - Duration::days(1)).date_naive();
    as_of_date > last_dataset_date
}
