//! End-to-end validation scenarios.

use autopsy::{validate, Inspect, Member, NotNull, Shape, Validator};

#[cfg(feature = "chrono")]
mod dated {
    use super::*;
    use autopsy::Utc;
    use chrono::{DateTime, FixedOffset, Local};

    struct Data {
        value: Option<String>,
        nullable_value: Option<i64>,
        start_date: DateTime<FixedOffset>,
    }

    struct Root {
        data: Data,
    }

    impl Inspect for Data {
        fn shape(&self) -> Shape<'_> {
            Shape::object(vec![
                Member::new("value", &self.value).constraint(NotNull::KIND),
                Member::new("nullableValue", &self.nullable_value).constraint(NotNull::KIND),
                Member::new("startDate", &self.start_date).constraint(Utc::KIND),
            ])
        }
    }

    impl Inspect for Root {
        fn shape(&self) -> Shape<'_> {
            Shape::object(vec![Member::new("data", &self.data)])
        }
    }

    fn root(start_date: &str) -> Root {
        Root {
            data: Data {
                value: None,
                nullable_value: None,
                start_date: DateTime::parse_from_rfc3339(start_date).unwrap(),
            },
        }
    }

    #[test]
    fn test_every_violation_is_reported() {
        let result = validate(&root("2024-03-01T09:30:00+02:00")).unwrap();

        assert!(!result.is_valid());
        let paths: Vec<String> = result.errors().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "instance.data.value",
                "instance.data.nullableValue",
                "instance.data.startDate",
            ]
        );

        let kinds: Vec<&str> = result.errors().iter().map(|e| e.constraint_kind()).collect();
        assert_eq!(kinds, vec!["NotNull", "NotNull", "Utc"]);
    }

    #[test]
    fn test_failure_message_lists_every_violation() {
        let result = validate(&root("2024-03-01T09:30:00+02:00")).unwrap();
        assert_eq!(
            result.failure_message(),
            Some(
                "[1/3] [instance.data.value] Value is required\n\
                 [2/3] [instance.data.nullableValue] Value is required\n\
                 [3/3] [instance.data.startDate] Date must be in UTC"
            )
        );
    }

    struct Schedule {
        created: DateTime<chrono::Utc>,
        opens: DateTime<Local>,
        closes: Option<DateTime<Local>>,
    }

    impl Inspect for Schedule {
        fn shape(&self) -> Shape<'_> {
            Shape::object(vec![
                Member::new("created", &self.created).constraint(Utc::KIND),
                Member::new("opens", &self.opens).constraint(Utc::KIND),
                Member::new("closes", &self.closes).constraint(Utc::KIND),
            ])
        }
    }

    #[test]
    fn test_utc_covers_chrono_timezones() {
        let now = chrono::Utc::now();
        let schedule = Schedule {
            created: now,
            opens: now.with_timezone(&Local),
            closes: None,
        };

        let result = validate(&schedule).unwrap();
        let paths: Vec<String> = result.errors().iter().map(|e| e.path.to_string()).collect();
        if schedule.opens.offset().local_minus_utc() == 0 {
            assert!(paths.is_empty());
        } else {
            assert_eq!(paths, vec!["instance.opens"]);
        }
    }

    #[test]
    fn test_utc_date_passes() {
        let result = validate(&root("2024-03-01T09:30:00Z")).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result
            .errors()
            .iter()
            .all(|e| e.constraint_kind() == "NotNull"));
    }
}

struct Empty;

impl Inspect for Empty {
    fn shape(&self) -> Shape<'_> {
        Shape::object(Vec::new())
    }
}

struct Unannotated {
    name: Option<String>,
    scores: Vec<u32>,
}

impl Inspect for Unannotated {
    fn shape(&self) -> Shape<'_> {
        Shape::object(vec![
            Member::new("name", &self.name),
            Member::new("scores", &self.scores),
        ])
    }
}

#[test]
fn test_empty_root_is_valid() {
    let result = validate(&Empty).unwrap();
    assert!(result.is_valid());
    assert!(result.errors().is_empty());
    assert_eq!(result.failure_message(), None);
}

#[test]
fn test_unannotated_members_never_fail() {
    let result = validate(&Unannotated {
        name: None,
        scores: vec![0, 1, 2],
    })
    .unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_leaf_roots_are_valid() {
    assert!(validate(&42u8).unwrap().is_valid());
    assert!(validate(&"text").unwrap().is_valid());
    assert!(validate(&Some(vec![1u8])).unwrap().is_valid());
}

struct Profile {
    nickname: Option<String>,
}

impl Inspect for Profile {
    fn shape(&self) -> Shape<'_> {
        Shape::object(vec![
            Member::new("nickname", &self.nickname).constraint(NotNull::KIND)
        ])
    }
}

#[test]
fn test_validation_is_idempotent() {
    let profile = Profile { nickname: None };
    let validator = Validator::new();

    let first = validator.validate(&profile).unwrap();
    let second = validator.validate(&profile).unwrap();

    assert_eq!(first.errors(), second.errors());
    assert_eq!(first.failure_message(), second.failure_message());
}

#[test]
fn test_values_are_read_at_validation_time() {
    let mut profile = Profile { nickname: None };
    assert!(!validate(&profile).unwrap().is_valid());

    profile.nickname = Some("ghost".to_string());
    assert!(validate(&profile).unwrap().is_valid());
}
