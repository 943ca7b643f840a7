//! Habit operations and daily completion toggling
//!
//! Streak counters are bookkept per toggle: completing a day adds one,
//! un-completing removes one (floored at zero). They are not recomputed from
//! the completion history.

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::optional_text;
use crate::error::{Error, Result};
use crate::models::{required_text, ArchiveState, Habit, HabitCompletion, HabitPatch, NewHabit};
use crate::storage::HabitRepository;

const ENTITY: &str = "Habit";

pub fn list_active<R: HabitRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Habit>> {
    repo.list_habits(user_id, ArchiveState::Active)
}

pub fn list_archived<R: HabitRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Habit>> {
    repo.list_habits(user_id, ArchiveState::Archived)
}

pub fn get<R: HabitRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<Habit> {
    repo.find_habit(id, user_id)?.ok_or(Error::NotFound(ENTITY))
}

#[instrument(skip(repo, new))]
pub fn create<R: HabitRepository>(repo: &R, user_id: Uuid, new: NewHabit) -> Result<Habit> {
    let name = required_text("Name", new.name.as_deref())?;
    let habit = Habit::new(user_id, name, optional_text(new.description));
    repo.create_habit(&habit)?;
    info!(habit_id = %habit.id, "Habit created");
    Ok(habit)
}

#[instrument(skip(repo, patch))]
pub fn update<R: HabitRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
    patch: HabitPatch,
) -> Result<Habit> {
    if patch.is_empty() {
        return Err(Error::validation("No updates provided"));
    }

    let mut habit = get(repo, id, user_id)?;
    if let Some(name) = patch.name.as_deref() {
        habit.name = required_text("Name", Some(name))?;
    }
    if patch.description.is_some() {
        habit.description = optional_text(patch.description);
    }
    habit.updated_at = Utc::now();

    if !repo.update_habit(&habit)? {
        return Err(Error::NotFound(ENTITY));
    }
    Ok(habit)
}

#[instrument(skip(repo))]
pub fn archive<R: HabitRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<()> {
    if !repo.set_habit_state(id, user_id, ArchiveState::Archived)? {
        return Err(Error::NotFound(ENTITY));
    }
    info!(habit_id = %id, "Habit archived");
    Ok(())
}

/// Flip the completion for `date` (today, UTC, when absent).
#[instrument(skip(repo))]
pub fn toggle_completion<R: HabitRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
    date: Option<NaiveDate>,
) -> Result<Habit> {
    let today = Utc::now().date_naive();
    repo.toggle_habit_completion(id, user_id, date.unwrap_or(today), today)?
        .ok_or(Error::NotFound(ENTITY))
}

/// Completion history of one owned habit, newest day first
pub fn completions<R: HabitRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
) -> Result<Vec<HabitCompletion>> {
    get(repo, id, user_id)?;
    repo.list_habit_completions(id, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::create_test_user;
    use crate::storage::Database;
    use chrono::Duration;

    fn new_habit(name: &str) -> NewHabit {
        NewHabit {
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[test]
    fn test_create_requires_name() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);

        let unnamed = NewHabit {
            name: None,
            description: Some("daily".into()),
        };
        assert!(matches!(create(&db, user_id, unnamed), Err(Error::Validation(_))));

        let habit = create(&db, user_id, new_habit("Journal")).unwrap();
        assert_eq!(habit.streak, 0);
        assert!(!habit.completed);
    }

    #[test]
    fn test_toggle_twice_reverts() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);
        let habit = create(&db, user_id, new_habit("Journal")).unwrap();

        let done = toggle_completion(&db, habit.id, user_id, None).unwrap();
        assert!(done.completed);
        assert_eq!(done.streak, 1);
        assert_eq!(done.total_completions, 1);

        let undone = toggle_completion(&db, habit.id, user_id, None).unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.streak, 0);
        assert_eq!(undone.total_completions, 0);
        assert_eq!(undone.longest_streak, 1);

        // Undoing again does not go negative
        let redo = toggle_completion(&db, habit.id, user_id, None).unwrap();
        assert_eq!(redo.streak, 1);
    }

    #[test]
    fn test_streak_counts_across_days() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);
        let habit = create(&db, user_id, new_habit("Walk")).unwrap();
        let today = Utc::now().date_naive();

        for days_ago in (0..3).rev() {
            toggle_completion(&db, habit.id, user_id, Some(today - Duration::days(days_ago)))
                .unwrap();
        }

        let habit = get(&db, habit.id, user_id).unwrap();
        assert_eq!(habit.streak, 3);
        assert_eq!(habit.longest_streak, 3);
        assert!(habit.completed);

        let history = completions(&db, habit.id, user_id).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].date, today);
    }

    #[test]
    fn test_toggle_other_users_habit_not_found() {
        let db = Database::open_in_memory().unwrap();
        let owner = create_test_user(&db);
        let other = create_test_user(&db);
        let habit = create(&db, owner, new_habit("Mine")).unwrap();

        assert!(matches!(
            toggle_completion(&db, habit.id, other, None),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            completions(&db, habit.id, other),
            Err(Error::NotFound(_))
        ));
        assert_eq!(get(&db, habit.id, owner).unwrap().streak, 0);
    }

    #[test]
    fn test_update_and_archive() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);
        let habit = create(&db, user_id, new_habit("Read")).unwrap();

        let patch = HabitPatch {
            name: None,
            description: Some("20 pages".into()),
        };
        let updated = update(&db, habit.id, user_id, patch).unwrap();
        assert_eq!(updated.description.as_deref(), Some("20 pages"));

        let blank_name = HabitPatch {
            name: Some(" ".into()),
            description: None,
        };
        assert!(matches!(
            update(&db, habit.id, user_id, blank_name),
            Err(Error::Validation(_))
        ));

        archive(&db, habit.id, user_id).unwrap();
        assert!(list_active(&db, user_id).unwrap().is_empty());
        assert_eq!(list_archived(&db, user_id).unwrap()[0].id, habit.id);
    }
}
