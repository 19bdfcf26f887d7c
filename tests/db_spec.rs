use std::collections::HashSet;

use dictation_server::db::Database;
use dictation_server::models::*;
use dictation_server::selection::{select_words, WordSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use speculate2::speculate;

const PARENT: i64 = 1;
const OTHER_PARENT: i64 = 2;

fn create_test_child(db: &Database, user_id: i64) -> Child {
    db.create_child(
        user_id,
        CreateChildInput {
            name: "小明".to_string(),
            grade: 3,
            semester: 1,
            textbook_version: "A".to_string(),
        },
    )
    .expect("Failed to create child")
}

fn seed_unit(db: &Database, unit: i64, words: &[&str]) {
    let items: Vec<CurriculumItemInput> = words
        .iter()
        .map(|word| CurriculumItemInput {
            grade: 3,
            semester: 1,
            textbook_version: "A".to_string(),
            unit,
            word: word.to_string(),
        })
        .collect();
    db.import_curriculum_items(&items)
        .expect("Failed to import curriculum");
}

fn new_feedback(title: &str) -> NewFeedback {
    NewFeedback {
        title: title.to_string(),
        content: "The audio is too quiet".to_string(),
        kind: "bug".to_string(),
        contact: None,
        images: vec![],
    }
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "children" {
        it "finds a child owned by the user" {
            let child = create_test_child(&db, PARENT);

            let found = db.find_child(child.id, PARENT).expect("Query failed");
            assert_eq!(found, Some(child));
        }

        it "hides a child from other users" {
            let child = create_test_child(&db, PARENT);

            let found = db.find_child(child.id, OTHER_PARENT).expect("Query failed");
            assert!(found.is_none());
        }

        it "returns None for a missing child" {
            assert!(db.find_child(999, PARENT).expect("Query failed").is_none());
        }
    }

    describe "dictation_config" {
        it "creates defaults on first access" {
            let child = create_test_child(&db, PARENT);
            assert!(db.get_config(child.id).expect("Query failed").is_none());

            let config = db.get_or_create_config(&child).expect("Failed to get config");

            assert_eq!(config.child_id, child.id);
            assert_eq!(config.words_per_dictation, DEFAULT_WORDS_PER_DICTATION);
            assert_eq!(config.review_days, DEFAULT_REVIEW_DAYS);
            assert_eq!(config.dictation_interval, DEFAULT_DICTATION_INTERVAL);
            assert_eq!(config.dictation_ratio, DEFAULT_DICTATION_RATIO);
            assert!(!config.wrong_words_only);
            assert!(db.get_config(child.id).expect("Query failed").is_some());
        }

        it "returns the existing config on later access" {
            let child = create_test_child(&db, PARENT);
            db.update_config(&child, UpdateDictationConfigInput {
                words_per_dictation: Some(4),
                ..Default::default()
            }).expect("Failed to update");

            let config = db.get_or_create_config(&child).expect("Failed to get config");
            assert_eq!(config.words_per_dictation, 4);
        }

        it "copies only the provided fields" {
            let child = create_test_child(&db, PARENT);

            let config = db.update_config(&child, UpdateDictationConfigInput {
                review_days: Some(7),
                wrong_words_only: Some(true),
                ..Default::default()
            }).expect("Failed to update");

            assert_eq!(config.review_days, 7);
            assert!(config.wrong_words_only);
            assert_eq!(config.words_per_dictation, DEFAULT_WORDS_PER_DICTATION);
            assert_eq!(config.dictation_ratio, DEFAULT_DICTATION_RATIO);
        }

        it "stores values without validating them" {
            let child = create_test_child(&db, PARENT);

            let config = db.update_config(&child, UpdateDictationConfigInput {
                dictation_ratio: Some(250),
                ..Default::default()
            }).expect("Failed to update");

            assert_eq!(config.dictation_ratio, 250);
        }
    }

    describe "curriculum" {
        it "matches on all four position fields" {
            seed_unit(&db, 2, &["水", "火"]);
            seed_unit(&db, 3, &["山"]);
            db.import_curriculum_items(&[CurriculumItemInput {
                grade: 3,
                semester: 1,
                textbook_version: "B".to_string(),
                unit: 2,
                word: "石".to_string(),
            }]).expect("Failed to import");

            let items = db.find_curriculum_items(3, 1, "A", 2).expect("Query failed");
            let words: Vec<&str> = items.iter().map(|i| i.word.as_str()).collect();
            assert_eq!(words, vec!["水", "火"]);
        }

        it "returns an empty list for an unknown unit" {
            seed_unit(&db, 2, &["水"]);
            assert!(db.find_curriculum_items(3, 1, "A", 8).expect("Query failed").is_empty());
        }
    }

    describe "tasks" {
        it "saves items in the given order" {
            let child = create_test_child(&db, PARENT);
            let words = vec!["你好".to_string(), "谢谢".to_string(), "你好".to_string()];

            let task = db.save_task(&child, PARENT, None, &words).expect("Failed to save");
            assert_eq!(task.words(), vec!["你好", "谢谢", "你好"]);
            assert_eq!(task.status, TaskStatus::Pending);

            let stored = db.get_task(task.id).expect("Query failed").expect("Task missing");
            assert_eq!(stored.child_id, child.id);
            assert_eq!(stored.user_id, PARENT);
            assert_eq!(stored.items, task.items);
        }

        it "saves an empty task" {
            let child = create_test_child(&db, PARENT);

            let task = db.save_task(&child, PARENT, Some(4), &[]).expect("Failed to save");
            let stored = db.get_task(task.id).expect("Query failed").expect("Task missing");

            assert!(stored.items.is_empty());
            assert_eq!(stored.unit, Some(4));
        }

        it "returns None for a missing task" {
            assert!(db.get_task(12345).expect("Query failed").is_none());
        }

        it "samples a unit through the database lookup" {
            let child = create_test_child(&db, PARENT);
            let elements = ["水", "火", "土", "木", "金", "日"];
            seed_unit(&db, 2, &elements);

            let words = select_words(
                WordSource::Unit(2),
                &child.curriculum_position(),
                &db,
                3,
                &mut StdRng::seed_from_u64(3),
            ).expect("Selection failed");

            assert_eq!(words.len(), 3);
            let unique: HashSet<&String> = words.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(words.iter().all(|w| elements.contains(&w.as_str())));
        }
    }

    describe "feedback" {
        it "creates pending feedback" {
            let feedback = db.create_feedback(PARENT, new_feedback("Quiet audio")).expect("Failed to create");

            assert_eq!(feedback.status, FeedbackStatus::Pending);
            assert_eq!(feedback.kind, "bug");
            assert_eq!(feedback.reply_count, 0);
        }

        it "lists only the user's feedback, newest first" {
            db.create_feedback(PARENT, new_feedback("First")).expect("Failed to create");
            db.create_feedback(OTHER_PARENT, new_feedback("Not mine")).expect("Failed to create");
            db.create_feedback(PARENT, new_feedback("Second")).expect("Failed to create");

            let page = db.list_feedback(PARENT, None, 1, 20).expect("Query failed");

            assert_eq!(page.total, 2);
            assert_eq!(page.pages, 1);
            let titles: Vec<&str> = page.feedbacks.iter().map(|f| f.title.as_str()).collect();
            assert_eq!(titles, vec!["Second", "First"]);
        }

        it "pages through results" {
            for i in 0..5 {
                db.create_feedback(PARENT, new_feedback(&format!("F{i}"))).expect("Failed to create");
            }

            let page = db.list_feedback(PARENT, None, 2, 2).expect("Query failed");

            assert_eq!(page.total, 5);
            assert_eq!(page.pages, 3);
            assert_eq!(page.page, 2);
            let titles: Vec<&str> = page.feedbacks.iter().map(|f| f.title.as_str()).collect();
            assert_eq!(titles, vec!["F2", "F1"]);
        }

        it "filters by status" {
            let resolved = db.create_feedback(PARENT, new_feedback("Done")).expect("Failed to create");
            db.create_feedback(PARENT, new_feedback("Open")).expect("Failed to create");
            db.set_feedback_status(resolved.id, FeedbackStatus::Resolved).expect("Failed to update");

            let page = db.list_feedback(PARENT, Some("resolved"), 1, 20).expect("Query failed");
            assert_eq!(page.total, 1);
            assert_eq!(page.feedbacks[0].title, "Done");

            let page = db.list_feedback(PARENT, Some("archived"), 1, 20).expect("Query failed");
            assert_eq!(page.total, 0);
            assert!(page.feedbacks.is_empty());
        }

        it "shows replies in the owner's detail view" {
            let feedback = db.create_feedback(PARENT, new_feedback("Quiet audio")).expect("Failed to create");
            db.add_feedback_reply(feedback.id, CreateReplyInput {
                content: "Fixed in the next release".to_string(),
                is_admin: true,
            }).expect("Failed to reply");

            let detail = db.get_feedback_detail(feedback.id, PARENT)
                .expect("Query failed")
                .expect("Feedback missing");
            assert_eq!(detail.feedback.reply_count, 1);
            assert_eq!(detail.replies.len(), 1);
            assert!(detail.replies[0].is_admin);

            assert!(db.get_feedback_detail(feedback.id, OTHER_PARENT).expect("Query failed").is_none());
        }

        it "returns an empty page for a huge page number" {
            db.create_feedback(PARENT, new_feedback("Only")).expect("Failed to create");

            let page = db.list_feedback(PARENT, None, i64::MAX, 20).expect("Query failed");
            assert!(page.feedbacks.is_empty());
            assert_eq!(page.total, 1);
            assert_eq!(page.pages, 1);

            let page = db.list_feedback(PARENT, None, 1, 20).expect("Database unusable after huge page");
            assert_eq!(page.feedbacks.len(), 1);
        }

        it "clamps per_page into range" {
            for i in 0..3 {
                db.create_feedback(PARENT, new_feedback(&format!("F{i}"))).expect("Failed to create");
            }

            for per_page in [0, -5, i64::MIN] {
                let page = db.list_feedback(PARENT, None, 1, per_page).expect("Query failed");
                assert_eq!(page.feedbacks.len(), 1);
                assert_eq!(page.pages, 3);
            }

            let page = db.list_feedback(PARENT, None, 1, i64::MAX).expect("Query failed");
            assert_eq!(page.feedbacks.len(), 3);
            assert_eq!(page.pages, 1);

            let page = db.list_feedback(PARENT, None, i64::MAX, i64::MAX).expect("Query failed");
            assert!(page.feedbacks.is_empty());
        }

        it "touches the feedback when a reply is added" {
            let feedback = db.create_feedback(PARENT, new_feedback("Quiet audio")).expect("Failed to create");
            std::thread::sleep(std::time::Duration::from_millis(5));

            let reply = db.add_feedback_reply(feedback.id, CreateReplyInput {
                content: "Looking into it".to_string(),
                is_admin: true,
            }).expect("Failed to reply");

            let detail = db.get_feedback_detail(feedback.id, PARENT)
                .expect("Query failed")
                .expect("Feedback missing");
            assert!(detail.feedback.updated_at > feedback.updated_at);
            assert_eq!(detail.feedback.updated_at, reply.created_at);
        }

        it "stores nothing when replying to missing feedback" {
            let feedback = db.create_feedback(PARENT, new_feedback("Quiet audio")).expect("Failed to create");
            db.add_feedback_reply(feedback.id + 1, CreateReplyInput {
                content: "Orphan".to_string(),
                is_admin: true,
            }).expect_err("Reply to missing feedback accepted");

            let detail = db.get_feedback_detail(feedback.id, PARENT)
                .expect("Query failed")
                .expect("Feedback missing");
            assert_eq!(detail.feedback.reply_count, 0);
            assert_eq!(detail.feedback.updated_at, feedback.updated_at);
        }

        it "refuses replies to missing feedback" {
            let result = db.add_feedback_reply(77, CreateReplyInput {
                content: "Hello".to_string(),
                is_admin: true,
            });
            assert!(result.is_err());
        }
    }
}

#[test]
fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("dictation.db");

    let child_id = {
        let db = Database::open(path.clone()).expect("Failed to open");
        db.migrate().expect("Failed to migrate");
        create_test_child(&db, PARENT).id
    };

    let db = Database::open(path).expect("Failed to reopen");
    db.migrate().expect("Failed to migrate");
    assert!(db.find_child(child_id, PARENT).expect("Query failed").is_some());
}
