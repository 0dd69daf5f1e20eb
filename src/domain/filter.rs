//! 列表过滤与文本搜索
//!
//! 所有过滤都保持输入顺序，并且是幂等的。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::projection::{AssignmentRow, ClassRow, SubmissionRow};
use crate::models::submissions::SubmissionStatus;
use crate::models::users::User;

/// 提交状态过滤
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub enum StatusFilter {
    #[default]
    All,
    /// 已提交、未评分（迟交不计入）
    Pending,
    Graded,
}

impl StatusFilter {
    pub fn matches(&self, status: SubmissionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == SubmissionStatus::Submitted,
            StatusFilter::Graded => status == SubmissionStatus::Graded,
        }
    }
}

/// 班级过滤：`all` 或具体班级 ID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassFilter {
    #[default]
    All,
    Id(i64),
}

impl ClassFilter {
    pub fn matches(&self, class_id: Option<i64>) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Id(id) => class_id == Some(*id),
        }
    }
}

impl std::str::FromStr for ClassFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(ClassFilter::All);
        }
        s.parse::<i64>()
            .map(ClassFilter::Id)
            .map_err(|_| format!("Invalid class filter: '{s}'. Expected 'all' or a class id"))
    }
}

impl<'de> Deserialize<'de> for ClassFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};
        use std::fmt;

        struct ClassFilterVisitor;

        impl Visitor<'_> for ClassFilterVisitor {
            type Value = ClassFilter;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("'all' or a class id")
            }

            fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ClassFilter::Id(value))
            }

            fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
                i64::try_from(value)
                    .map(ClassFilter::Id)
                    .map_err(|_| E::custom("class id out of range"))
            }

            fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ClassFilterVisitor)
    }
}

/// 可被文本搜索的记录
pub trait Searchable {
    /// 参与匹配的文本字段
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for SubmissionRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.student_name.as_str(),
            self.student_email.as_str(),
            self.assignment_title.as_str(),
            self.class_name.as_str(),
        ]
    }
}

impl Searchable for AssignmentRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.class_name.as_str(),
            self.teacher_name.as_str(),
        ]
    }
}

impl Searchable for ClassRow {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.code.as_str(),
            self.teacher_name.as_str(),
        ];
        if let Some(subject) = &self.subject {
            fields.push(subject);
        }
        fields
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

/// 规范化查询串；空白查询返回 `None`（即匹配全部）
fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

fn matches_normalized<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// 大小写不敏感的子串匹配
pub fn matches_query<T: Searchable>(item: &T, query: Option<&str>) -> bool {
    match normalize_query(query) {
        Some(needle) => matches_normalized(item, &needle),
        None => true,
    }
}

/// 按文本过滤，保持顺序
pub fn search<T: Searchable>(items: Vec<T>, query: Option<&str>) -> Vec<T> {
    match normalize_query(query) {
        Some(needle) => items
            .into_iter()
            .filter(|item| matches_normalized(item, &needle))
            .collect(),
        None => items,
    }
}

/// 提交列表的组合过滤条件
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub status: StatusFilter,
    pub class: ClassFilter,
    pub query: Option<String>,
}

impl SubmissionFilter {
    pub fn new(status: StatusFilter, class: ClassFilter, query: Option<String>) -> Self {
        Self {
            status,
            class,
            query,
        }
    }

    pub fn matches(&self, row: &SubmissionRow) -> bool {
        self.status.matches(row.status)
            && self.class.matches(row.class_id)
            && matches_query(row, self.query.as_deref())
    }

    pub fn apply(&self, rows: Vec<SubmissionRow>) -> Vec<SubmissionRow> {
        let needle = normalize_query(self.query.as_deref());
        rows.into_iter()
            .filter(|row| {
                self.status.matches(row.status)
                    && self.class.matches(row.class_id)
                    && needle
                        .as_deref()
                        .is_none_or(|n| matches_normalized(row, n))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::fixtures::*;
    use crate::domain::projection::{Lookup, SubmissionRow};
    use crate::models::users::UserRole;

    fn rows() -> Vec<SubmissionRow> {
        let users = vec![
            user(4, "Ann Lee", UserRole::Student, ts(1, 0)),
            user(5, "Bob Stone", UserRole::Student, ts(1, 0)),
        ];
        let classes = vec![
            class(1, "Biology", 10, vec![4, 5]),
            class(2, "Chemistry", 10, vec![4]),
        ];
        let assignments = vec![
            assignment(11, 1, "Cell Diagram", ts(10, 0)),
            assignment(12, 2, "Titration Report", ts(11, 0)),
        ];
        let submissions = vec![
            submission(1, 11, 4, SubmissionStatus::Submitted, None),
            submission(2, 11, 5, SubmissionStatus::Graded, Some(88.0)),
            submission(3, 12, 4, SubmissionStatus::Late, None),
            submission(4, 12, 4, SubmissionStatus::Graded, Some(61.5)),
            submission(5, 11, 5, SubmissionStatus::Submitted, None),
        ];
        Lookup::new(&assignments, &classes, &users).submissions(&submissions)
    }

    fn ids(rows: &[SubmissionRow]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_all_filters_return_input_unchanged() {
        let input = rows();
        let out = SubmissionFilter::default().apply(input.clone());
        assert_eq!(out, input);
    }

    #[test]
    fn test_pending_excludes_late_and_graded() {
        let f = SubmissionFilter::new(StatusFilter::Pending, ClassFilter::All, None);
        assert_eq!(ids(&f.apply(rows())), vec![1, 5]);
    }

    #[test]
    fn test_graded_only() {
        let f = SubmissionFilter::new(StatusFilter::Graded, ClassFilter::All, None);
        assert_eq!(ids(&f.apply(rows())), vec![2, 4]);
    }

    #[test]
    fn test_class_filter() {
        let f = SubmissionFilter::new(StatusFilter::All, ClassFilter::Id(2), None);
        assert_eq!(ids(&f.apply(rows())), vec![3, 4]);
        let f = SubmissionFilter::new(StatusFilter::All, ClassFilter::Id(99), None);
        assert!(f.apply(rows()).is_empty());
    }

    #[test]
    fn test_text_search_is_case_insensitive_across_fields() {
        let by_student = SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("bOB".into()));
        assert_eq!(ids(&by_student.apply(rows())), vec![2, 5]);

        let by_email = SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("ann.lee@".into()));
        assert_eq!(ids(&by_email.apply(rows())), vec![1, 3, 4]);

        let by_title = SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("titration".into()));
        assert_eq!(ids(&by_title.apply(rows())), vec![3, 4]);

        let by_class = SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("BIO".into()));
        assert_eq!(ids(&by_class.apply(rows())), vec![1, 2, 5]);
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let f = SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("   ".into()));
        assert_eq!(f.apply(rows()).len(), 5);
        assert!(matches_query(&rows()[0], Some("")));
    }

    #[test]
    fn test_combined_predicates() {
        let f = SubmissionFilter::new(StatusFilter::Graded, ClassFilter::Id(1), Some("stone".into()));
        assert_eq!(ids(&f.apply(rows())), vec![2]);
        assert!(rows().iter().filter(|r| f.matches(r)).count() == 1);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let filters = [
            SubmissionFilter::new(StatusFilter::Pending, ClassFilter::All, None),
            SubmissionFilter::new(StatusFilter::Graded, ClassFilter::Id(2), None),
            SubmissionFilter::new(StatusFilter::All, ClassFilter::All, Some("ann".into())),
        ];
        for f in filters {
            let once = f.apply(rows());
            let twice = f.apply(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_search_on_class_rows_includes_subject() {
        let teacher = user(10, "Ms Curie", UserRole::Teacher, ts(1, 0));
        let classes = vec![class(1, "Period 3", 10, vec![]), class(2, "Period 4", 10, vec![])];
        let lookup = Lookup::new(&[], &classes, std::slice::from_ref(&teacher));
        let found = search(lookup.classes(&classes), Some("science"));
        assert_eq!(found.len(), 2);
        let found = search(lookup.classes(&classes), Some("period 4"));
        assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        let found = search(lookup.classes(&classes), Some("curie"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_search_users() {
        let users = vec![
            user(1, "Alan Turing", UserRole::Admin, ts(1, 0)),
            user(2, "Ada Lovelace", UserRole::Teacher, ts(1, 0)),
        ];
        let found = search(users, Some("LOVE"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    #[test]
    fn test_class_filter_parsing() {
        assert_eq!("all".parse::<ClassFilter>(), Ok(ClassFilter::All));
        assert_eq!("ALL".parse::<ClassFilter>(), Ok(ClassFilter::All));
        assert_eq!("".parse::<ClassFilter>(), Ok(ClassFilter::All));
        assert_eq!(" 42 ".parse::<ClassFilter>(), Ok(ClassFilter::Id(42)));
        assert!("physics".parse::<ClassFilter>().is_err());
        assert_eq!(
            serde_json::from_str::<ClassFilter>("7").unwrap(),
            ClassFilter::Id(7)
        );
        assert_eq!(
            serde_json::from_str::<ClassFilter>("\"all\"").unwrap(),
            ClassFilter::All
        );
    }

    #[test]
    fn test_status_filter_wire_names() {
        assert_eq!(
            serde_json::from_str::<StatusFilter>("\"pending\"").unwrap(),
            StatusFilter::Pending
        );
        assert!(serde_json::from_str::<StatusFilter>("\"late\"").is_err());
    }
}
