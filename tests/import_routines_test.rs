// ABOUTME: Integration tests for the all-or-nothing routine import pipeline
// ABOUTME: Covers reference resolution aborts, positional renumbering, and rest-duration handling

mod common;

use common::{exercise_record, test_database};
use repforge::database::routines::RoutinesManager;
use repforge::import::records::{
    NamedRef, RoutineDayRecord, RoutineExerciseRecord, RoutineRecord, RoutineSetRecord,
    RoutineWeekRecord,
};
use repforge::import::{ExerciseImporter, RoutineImporter};
use repforge::models::SetType;

fn set(reps: i64, rest: Option<&str>) -> RoutineSetRecord {
    RoutineSetRecord {
        reps: Some(reps),
        percent_one_rm: Some(70),
        rest: rest.map(str::to_owned),
        set_type: SetType::Normal,
    }
}

fn slot(exercise: &str, sets: Vec<RoutineSetRecord>) -> RoutineExerciseRecord {
    RoutineExerciseRecord {
        exercise: NamedRef {
            name: Some(exercise.to_owned()),
        },
        sets,
    }
}

fn routine(name: &str, slots: Vec<RoutineExerciseRecord>) -> RoutineRecord {
    RoutineRecord {
        name: name.to_owned(),
        description: "Three day split".to_owned(),
        difficulty: "Intermediate".to_owned(),
        session_duration: "60 min".to_owned(),
        frequency: "3x week".to_owned(),
        image_source: "routines/ppl.png".to_owned(),
        weeks: vec![RoutineWeekRecord {
            days: vec![RoutineDayRecord { exercises: slots }],
        }],
    }
}

async fn seed_exercises(database: &repforge::database::Database, names: &[&str]) {
    let records: Vec<_> = names
        .iter()
        .map(|name| exercise_record(name, "Legs", "Quadriceps", &[]))
        .collect();
    let report = ExerciseImporter::new(database).import(&records).await;
    assert_eq!(report.exercises_created as usize, names.len());
}

#[tokio::test]
async fn persists_a_full_tree_with_positional_numbering() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat", "Bench Press"]).await;

    let records = vec![RoutineRecord {
        weeks: vec![
            RoutineWeekRecord {
                days: vec![
                    RoutineDayRecord {
                        exercises: vec![
                            slot("Squat", vec![set(10, Some("0:02")), set(8, Some("0:03"))]),
                            slot("Bench Press", vec![set(12, None)]),
                        ],
                    },
                    RoutineDayRecord {
                        exercises: vec![slot("Squat", vec![set(5, Some("0:05"))])],
                    },
                ],
            },
            RoutineWeekRecord {
                days: vec![RoutineDayRecord {
                    exercises: vec![slot("Bench Press", vec![])],
                }],
            },
        ],
        ..routine("Push Pull Legs", Vec::new())
    }];

    let report = RoutineImporter::new(&database).import(&records).await;

    assert!(!report.critical_failure);
    assert!(!report.has_errors(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.routines_created, 1);
    assert_eq!(report.total_processed, 1);

    let routines = RoutinesManager::new(database.pool().clone());
    let (summaries, total) = routines
        .list(&repforge::pagination::PaginationParams {
            page: None,
            page_size: None,
            name: None,
        })
        .await
        .expect("list succeeds");
    assert_eq!(total, 1);
    assert_eq!(summaries[0].name, "Push Pull Legs");

    let tree = routines
        .get(summaries[0].id)
        .await
        .expect("get succeeds")
        .expect("routine exists");
    assert_eq!(tree.weeks.len(), 2);
    assert_eq!(tree.weeks[0].week_number, 1);
    assert_eq!(tree.weeks[1].week_number, 2);
    assert_eq!(tree.weeks[0].days.len(), 2);
    assert_eq!(tree.weeks[0].days[1].day_number, 2);

    let first_day = &tree.weeks[0].days[0];
    assert_eq!(first_day.exercises.len(), 2);
    assert_eq!(first_day.exercises[0].exercise_name, "Squat");
    assert_eq!(first_day.exercises[0].position, 1);
    assert_eq!(first_day.exercises[1].exercise_name, "Bench Press");
    assert_eq!(first_day.exercises[1].position, 2);

    let squat_sets = &first_day.exercises[0].sets;
    assert_eq!(squat_sets.len(), 2);
    assert_eq!(squat_sets[0].set_number, 1);
    assert_eq!(squat_sets[0].rest_seconds, Some(120));
    assert_eq!(squat_sets[1].set_number, 2);
    assert_eq!(squat_sets[1].rest_seconds, Some(180));
}

#[tokio::test]
async fn one_unknown_exercise_aborts_the_whole_import() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat", "Bench Press"]).await;

    let records = vec![routine(
        "Push Pull Legs",
        vec![
            slot("Squat", vec![set(10, None)]),
            slot("Mystery Lift", vec![set(10, None)]),
            slot("Bench Press", vec![set(10, None)]),
        ],
    )];

    let report = RoutineImporter::new(&database).import(&records).await;

    assert!(report.critical_failure);
    assert_eq!(report.routines_created, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].name.as_deref(), Some("Mystery Lift"));
    assert_eq!(
        report.errors[0].message,
        "Exercise not found in the database"
    );

    let routines = RoutinesManager::new(database.pool().clone());
    let (_, total) = routines
        .list(&repforge::pagination::PaginationParams {
            page: None,
            page_size: None,
            name: None,
        })
        .await
        .expect("list succeeds");
    assert_eq!(total, 0, "no partial tree may persist");
}

#[tokio::test]
async fn missing_exercise_name_aborts_the_whole_import() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat"]).await;

    let records = vec![routine(
        "Legs Focus",
        vec![
            slot("Squat", vec![set(10, None)]),
            RoutineExerciseRecord {
                exercise: NamedRef { name: None },
                sets: vec![set(8, None)],
            },
        ],
    )];

    let report = RoutineImporter::new(&database).import(&records).await;

    assert!(report.critical_failure);
    assert_eq!(report.routines_created, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].name.as_deref(), Some(""));
    assert_eq!(
        report.errors[0].message,
        "Exercise not found in the database"
    );

    let routines = RoutinesManager::new(database.pool().clone());
    let (_, total) = routines
        .list(&repforge::pagination::PaginationParams {
            page: None,
            page_size: None,
            name: None,
        })
        .await
        .expect("list succeeds");
    assert_eq!(total, 0, "a blank reference persists nothing");
}

#[tokio::test]
async fn exercise_references_resolve_case_insensitively() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat"]).await;

    let records = vec![routine("Legs Focus", vec![slot("sQuAt", vec![set(10, None)])])];
    let report = RoutineImporter::new(&database).import(&records).await;

    assert!(!report.critical_failure);
    assert_eq!(report.routines_created, 1);
}

#[tokio::test]
async fn invalid_rest_duration_drops_only_that_set() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat"]).await;

    let records = vec![routine(
        "Legs Focus",
        vec![slot(
            "Squat",
            vec![
                set(10, Some("0:02")),
                set(8, Some("not-a-duration")),
                set(6, Some("0:01:30")),
            ],
        )],
    )];

    let report = RoutineImporter::new(&database).import(&records).await;

    assert!(!report.critical_failure);
    assert_eq!(report.routines_created, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].name.as_deref(), Some("Squat"));
    assert!(report.errors[0]
        .message
        .contains("Invalid rest duration format: not-a-duration"));

    let routines = RoutinesManager::new(database.pool().clone());
    let (summaries, _) = routines
        .list(&repforge::pagination::PaginationParams {
            page: None,
            page_size: None,
            name: None,
        })
        .await
        .expect("list succeeds");
    let tree = routines
        .get(summaries[0].id)
        .await
        .expect("get succeeds")
        .expect("routine exists");

    let sets = &tree.weeks[0].days[0].exercises[0].sets;
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].rest_seconds, Some(120));
    assert_eq!(sets[1].rest_seconds, Some(90));
    assert_eq!(sets[1].set_number, 2, "numbering stays contiguous");
}

#[tokio::test]
async fn duplicate_routine_name_is_fatal_for_the_call() {
    let database = test_database().await;
    seed_exercises(&database, &["Squat"]).await;

    let records = vec![routine("Legs Focus", vec![slot("Squat", vec![set(10, None)])])];
    let importer = RoutineImporter::new(&database);

    let first = importer.import(&records).await;
    assert_eq!(first.routines_created, 1);

    let second = importer.import(&records).await;
    assert!(second.critical_failure);
    assert_eq!(second.routines_created, 0);
    assert_eq!(second.errors.len(), 1);
    assert!(second.errors[0]
        .message
        .contains("Fatal error while saving routines"));
}
