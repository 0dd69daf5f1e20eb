//! 资源访问规则
//!
//! 管理员可访问全部资源；教师只能管理自己名下的班级及其作业、提交；
//! 学生只能查看已加入的班级和自己的提交。

use crate::models::{
    classes::Class,
    submissions::Submission,
    users::{User, UserRole},
};

pub fn can_view_class(user: &User, class: &Class) -> bool {
    can_manage_class(user, class) || class.has_student(user.id)
}

pub fn can_manage_class(user: &User, class: &Class) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => class.teacher_id == user.id,
        UserRole::Student => false,
    }
}

/// 提交人、班级教师或管理员可查看；班级缺失时只有提交人与管理员
pub fn can_view_submission(user: &User, submission: &Submission, class: Option<&Class>) -> bool {
    submission.student_id == user.id
        || user.role == UserRole::Admin
        || class.is_some_and(|c| can_manage_class(user, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::fixtures::{class, submission, ts, user};
    use crate::models::submissions::SubmissionStatus;

    #[test]
    fn test_class_visibility() {
        let algebra = class(1, "Algebra", 10, vec![20]);
        let owner = user(10, "Owner", UserRole::Teacher, ts(1, 0));
        let other_teacher = user(11, "Other", UserRole::Teacher, ts(1, 0));
        let enrolled = user(20, "In", UserRole::Student, ts(1, 0));
        let outsider = user(21, "Out", UserRole::Student, ts(1, 0));
        let admin = user(1, "Root", UserRole::Admin, ts(1, 0));

        assert!(can_manage_class(&owner, &algebra));
        assert!(can_manage_class(&admin, &algebra));
        assert!(!can_manage_class(&other_teacher, &algebra));
        assert!(!can_manage_class(&enrolled, &algebra));

        assert!(can_view_class(&enrolled, &algebra));
        assert!(!can_view_class(&outsider, &algebra));
        assert!(!can_view_class(&other_teacher, &algebra));
    }

    #[test]
    fn test_student_with_teacher_id_cannot_manage() {
        // 学生 ID 恰好等于 teacher_id 也不能管理
        let odd = class(1, "Odd", 20, vec![]);
        let student = user(20, "S", UserRole::Student, ts(1, 0));
        assert!(!can_manage_class(&student, &odd));
    }

    #[test]
    fn test_submission_visibility() {
        let algebra = class(1, "Algebra", 10, vec![20, 21]);
        let s = submission(5, 100, 20, SubmissionStatus::Submitted, None);

        let author = user(20, "A", UserRole::Student, ts(1, 0));
        let classmate = user(21, "B", UserRole::Student, ts(1, 0));
        let owner = user(10, "T", UserRole::Teacher, ts(1, 0));
        let admin = user(1, "Root", UserRole::Admin, ts(1, 0));

        assert!(can_view_submission(&author, &s, Some(&algebra)));
        assert!(!can_view_submission(&classmate, &s, Some(&algebra)));
        assert!(can_view_submission(&owner, &s, Some(&algebra)));
        assert!(!can_view_submission(&owner, &s, None));
        assert!(can_view_submission(&admin, &s, None));
    }
}
