// ABOUTME: Integration tests for the exercises manager against a real SQLite schema
// ABOUTME: Covers the case-insensitive unique index, the update path, and paginated queries

mod common;

use common::{exercise_record, test_database};
use repforge::database::exercises::ExercisesManager;
use repforge::database::muscles::MusclesManager;
use repforge::import::ConstraintKind;
use repforge::import::ExerciseImporter;
use repforge::models::NewExercise;
use repforge::pagination::PaginationParams;

fn params(page: Option<u32>, page_size: Option<u32>, name: Option<&str>) -> PaginationParams {
    PaginationParams {
        page,
        page_size,
        name: name.map(str::to_owned),
    }
}

#[tokio::test]
async fn name_uniqueness_is_case_insensitive_at_the_storage_level() {
    let database = test_database().await;
    let muscles = MusclesManager::new(database.pool().clone());
    let exercises = ExercisesManager::new(database.pool().clone());

    let group = muscles.create_group("Legs").await.expect("group created");
    let primary = muscles.create_muscle("Quadriceps").await.expect("muscle created");

    let staged = NewExercise {
        name: "Squat".into(),
        description: "Barbell back squat".into(),
        muscle_group_id: group.id,
        primary_muscle_id: primary.id,
        secondary_muscle_ids: Vec::new(),
    };

    let mut tx = database.pool().begin().await.expect("tx begins");
    exercises.insert(&mut *tx, &staged).await.expect("first insert works");
    tx.commit().await.expect("commit works");

    let mut clashing = staged.clone();
    clashing.name = "sQUAT".into();

    let mut tx = database.pool().begin().await.expect("tx begins");
    let err = exercises
        .insert(&mut *tx, &clashing)
        .await
        .expect_err("case variant must violate the unique index");
    assert_eq!(ConstraintKind::classify(&err), Some(ConstraintKind::Unique));
    // Release the transaction's connection before querying the pool again.
    tx.rollback().await.expect("rollback works");

    assert!(exercises.name_exists("SQUAT").await.expect("query works"));
    assert!(!exercises.name_exists("Deadlift").await.expect("query works"));
}

#[tokio::test]
async fn update_replaces_description_and_the_full_secondary_set() {
    let database = test_database().await;
    let importer = ExerciseImporter::new(&database);
    let report = importer
        .import(&[exercise_record(
            "Squat",
            "Legs",
            "Quadriceps",
            &["Glutes", "Hamstrings"],
        )])
        .await;
    assert_eq!(report.exercises_created, 1);

    let muscles = MusclesManager::new(database.pool().clone());
    let calves = muscles.create_muscle("Calves").await.expect("muscle created");

    let exercises = ExercisesManager::new(database.pool().clone());
    let stored = exercises.list_all().await.expect("list succeeds");
    let id = stored[0].id;

    let updated = exercises
        .update(id, "Low-bar variation", &[calves.id])
        .await
        .expect("update succeeds");
    assert!(updated);

    let after = exercises.get(id).await.expect("get succeeds").expect("row exists");
    assert_eq!(after.description, "Low-bar variation");
    assert_eq!(after.secondary_muscles, vec!["Calves"]);

    let missing = exercises
        .update(9999, "whatever", &[])
        .await
        .expect("update succeeds");
    assert!(!missing, "unknown id reports no update");
}

#[tokio::test]
async fn schema_and_rows_survive_reopening_an_on_disk_database() {
    let dir = tempfile::tempdir().expect("tempdir creates");
    let url = format!("sqlite:{}/repforge.db", dir.path().display());

    {
        let database = repforge::database::Database::new(&url)
            .await
            .expect("database opens");
        let report = ExerciseImporter::new(&database)
            .import(&[exercise_record("Squat", "Legs", "Quadriceps", &[])])
            .await;
        assert_eq!(report.exercises_created, 1);
    }

    let database = repforge::database::Database::new(&url)
        .await
        .expect("database reopens");
    let exercises = ExercisesManager::new(database.pool().clone());
    assert!(exercises.name_exists("squat").await.expect("query works"));
}

#[tokio::test]
async fn list_orders_by_name_and_filters_by_suffix() {
    let database = test_database().await;
    let importer = ExerciseImporter::new(&database);
    let records = vec![
        exercise_record("Overhead Press", "Shoulders", "Deltoids", &[]),
        exercise_record("Bench Press", "Chest", "Pectorals", &[]),
        exercise_record("Squat", "Legs", "Quadriceps", &[]),
        exercise_record("Leg Press", "Legs", "Quadriceps", &[]),
    ];
    assert_eq!(importer.import(&records).await.exercises_created, 4);

    let exercises = ExercisesManager::new(database.pool().clone());

    let (all, total) = exercises
        .list(&params(None, None, None))
        .await
        .expect("list succeeds");
    assert_eq!(total, 4);
    let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Bench Press", "Leg Press", "Overhead Press", "Squat"]
    );

    let (pressed, total) = exercises
        .list(&params(None, None, Some("Press")))
        .await
        .expect("list succeeds");
    assert_eq!(total, 3);
    assert!(pressed.iter().all(|e| e.name.ends_with("Press")));

    let (page_two, total) = exercises
        .list(&params(Some(2), Some(3), None))
        .await
        .expect("list succeeds");
    assert_eq!(total, 4);
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].name, "Squat");

    // Out-of-range parameters clamp rather than fail.
    let (clamped, _) = exercises
        .list(&params(Some(0), Some(500), None))
        .await
        .expect("list succeeds");
    assert_eq!(clamped.len(), 4);
}
