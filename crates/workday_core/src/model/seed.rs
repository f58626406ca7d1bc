//! Sample dataset used when no daily-task document can be loaded.

use crate::model::bucket::{BucketDate, DailyBucket};
use crate::model::task::{Priority, Task};
use chrono::{Days, NaiveDate};

/// Builds the sample buckets for `today` and the day before it.
pub fn sample_buckets(today: NaiveDate) -> Vec<DailyBucket> {
    let mut buckets = vec![
        bucket(
            "onboarding",
            today,
            vec![
                sample(
                    "Review partner application",
                    "Check all required documents and information",
                    Priority::High,
                    false,
                ),
                sample(
                    "Schedule onboarding call",
                    "Set up initial meeting with new partner",
                    Priority::Medium,
                    false,
                ),
            ],
        ),
        bucket(
            "accounts",
            today,
            vec![sample(
                "Follow up with client",
                "Check on project status and next steps",
                Priority::Low,
                false,
            )],
        ),
    ];

    if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        buckets.push(bucket(
            "onboarding",
            yesterday,
            vec![
                sample(
                    "Complete partner verification",
                    "Verify all partner documents and credentials",
                    Priority::High,
                    true,
                ),
                sample(
                    "Send welcome email",
                    "Send onboarding welcome email to new partner",
                    Priority::Medium,
                    false,
                ),
            ],
        ));
        buckets.push(bucket(
            "accounts",
            yesterday,
            vec![sample(
                "Update client dashboard",
                "Add new features to client portal",
                Priority::Low,
                false,
            )],
        ));
    }

    buckets
}

fn bucket(process_id: &str, day: NaiveDate, todos: Vec<Task>) -> DailyBucket {
    DailyBucket {
        process_id: process_id.to_string(),
        date: BucketDate::Day(day),
        todos,
    }
}

fn sample(title: &str, description: &str, priority: Priority, completed: bool) -> Task {
    let mut task = Task::new(title, priority);
    task.description = Some(description.to_string());
    task.completed = completed;
    task
}

#[cfg(test)]
mod tests {
    use super::sample_buckets;
    use crate::model::bucket::BucketDate;
    use chrono::NaiveDate;

    #[test]
    fn sample_covers_today_and_yesterday() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let buckets = sample_buckets(today);
        assert_eq!(buckets.len(), 4);
        let yesterday = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(buckets
            .iter()
            .any(|b| b.process_id == "onboarding" && b.date == BucketDate::Day(yesterday)));
    }
}
