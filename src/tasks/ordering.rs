use std::cmp::Ordering;

use super::repo::Task;

/// Display order for a list's tasks. Pure; recomputed on every read.
///
/// Most significant key first:
/// 1. incomplete before complete
/// 2. favorites before non-favorites within a completion group
/// 3. tasks with a due date before tasks without one
/// 4. among dated tasks, later due date first
///
/// Entries equal on all keys keep their input order (stable sort, no
/// secondary key).
pub fn order_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(compare);
    tasks
}

fn compare(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.favorite.cmp(&a.favorite))
        .then_with(|| a.due_date.is_none().cmp(&b.due_date.is_none()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            _ => Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::{OffsetDateTime, PrimitiveDateTime};
    use uuid::Uuid;

    fn task(
        name: &str,
        completed: bool,
        favorite: bool,
        due_date: Option<PrimitiveDateTime>,
    ) -> Task {
        Task {
            id: Uuid::new_v4(),
            name: name.to_string(),
            due_date,
            completed,
            favorite,
            list_id: Uuid::nil(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(order_tasks(Vec::new()).is_empty());
    }

    #[test]
    fn incomplete_always_sorts_before_complete() {
        // The complete task is a dated favorite and still loses.
        let done = task("done", true, true, Some(datetime!(2024-06-01 09:00:00)));
        let open = task("open", false, false, None);
        let ordered = order_tasks(vec![done, open]);
        assert_eq!(names(&ordered), vec!["open", "done"]);
    }

    #[test]
    fn favorite_sorts_before_plain_within_group() {
        let plain = task("plain", false, false, None);
        let starred = task("starred", false, true, None);
        let ordered = order_tasks(vec![plain, starred]);
        assert_eq!(names(&ordered), vec!["starred", "plain"]);
    }

    #[test]
    fn dated_sorts_before_undated_within_group() {
        let undated = task("undated", false, false, None);
        let dated = task("dated", false, false, Some(datetime!(2024-06-01 09:00:00)));
        let ordered = order_tasks(vec![undated, dated]);
        assert_eq!(names(&ordered), vec!["dated", "undated"]);
    }

    #[test]
    fn later_due_dates_sort_first() {
        let sooner = task("sooner", false, false, Some(datetime!(2024-06-01 09:00:00)));
        let later = task("later", false, false, Some(datetime!(2024-07-01 09:00:00)));
        let ordered = order_tasks(vec![sooner.clone(), later.clone()]);
        assert_eq!(names(&ordered), vec!["later", "sooner"]);
    }

    #[test]
    fn all_undated_still_partitions_by_completion_and_favorite() {
        let a = task("done", true, false, None);
        let b = task("open-plain", false, false, None);
        let c = task("open-starred", false, true, None);
        let ordered = order_tasks(vec![a, b, c]);
        assert_eq!(names(&ordered), vec!["open-starred", "open-plain", "done"]);
    }

    #[test]
    fn equal_tasks_keep_input_order() {
        let first = task("first", false, false, None);
        let second = task("second", false, false, None);
        let third = task("third", false, false, None);
        let ordered = order_tasks(vec![first, second, third]);
        assert_eq!(names(&ordered), vec!["first", "second", "third"]);
    }

    #[test]
    fn equal_tasks_keep_creation_order() {
        // The repo fetches oldest-first, so with random uuids the
        // tie-break has to fall through to creation time.
        let mut oldest = task("oldest", false, false, None);
        let mut middle = task("middle", false, false, None);
        let mut newest = task("newest", false, false, None);
        oldest.id = Uuid::max();
        newest.id = Uuid::nil();
        oldest.created_at = OffsetDateTime::UNIX_EPOCH;
        middle.created_at = OffsetDateTime::UNIX_EPOCH + time::Duration::hours(1);
        newest.created_at = OffsetDateTime::UNIX_EPOCH + time::Duration::hours(2);
        let ordered = order_tasks(vec![oldest, middle, newest]);
        assert_eq!(names(&ordered), vec!["oldest", "middle", "newest"]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let input = vec![
            task("a", true, false, None),
            task("b", false, true, Some(datetime!(2024-06-10 00:00:00))),
            task("c", false, false, Some(datetime!(2024-06-20 00:00:00))),
            task("d", false, false, None),
            task("e", false, true, None),
        ];
        let once = order_tasks(input);
        let twice = order_tasks(once.clone());
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn full_priority_stack() {
        let input = vec![
            task("done-fav", true, true, Some(datetime!(2024-06-05 12:00:00))),
            task("open-plain-undated", false, false, None),
            task("open-plain-early", false, false, Some(datetime!(2024-06-01 12:00:00))),
            task("open-fav-undated", false, true, None),
            task("open-plain-late", false, false, Some(datetime!(2024-06-09 12:00:00))),
            task("open-fav-late", false, true, Some(datetime!(2024-06-09 12:00:00))),
        ];
        let ordered = order_tasks(input);
        assert_eq!(
            names(&ordered),
            vec![
                "open-fav-late",
                "open-fav-undated",
                "open-plain-late",
                "open-plain-early",
                "open-plain-undated",
                "done-fav",
            ]
        );
    }
}
