/// 业务错误码
///
/// 按资源分段：1xxx 通用，2xxx 认证，3xxx 用户，4xxx 班级，5xxx 作业，6xxx 提交。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,

    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserEmailAlreadyExists = 3005,
    UserCreationFailed = 3006,
    UserUpdateFailed = 3007,
    UserDeleteFailed = 3008,
    CanNotDeleteCurrentUser = 3009,

    ClassNotFound = 4000,
    ClassAlreadyExists = 4001,
    ClassCreationFailed = 4002,
    ClassDeleteFailed = 4003,
    ClassPermissionDenied = 4004,
    ClassCodeInvalid = 4005,
    ClassAlreadyJoined = 4006,
    ClassJoinFailed = 4007,
    ClassStudentNotFound = 4008,

    AssignmentNotFound = 5000,
    AssignmentInvalid = 5001,
    AssignmentDueDateLocked = 5002,

    SubmissionNotFound = 6000,
    SubmissionAlreadyGraded = 6001,
    GradeInvalid = 6002,
}

impl ErrorCode {
    /// 数值形式（写入响应体的 `code` 字段）
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_zero() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
    }

    #[test]
    fn test_codes_are_grouped_by_resource() {
        assert_eq!(ErrorCode::AuthFailed.as_i32() / 1000, 2);
        assert_eq!(ErrorCode::UserNotFound.as_i32() / 1000, 3);
        assert_eq!(ErrorCode::ClassNotFound.as_i32() / 1000, 4);
        assert_eq!(ErrorCode::AssignmentDueDateLocked.as_i32() / 1000, 5);
        assert_eq!(ErrorCode::GradeInvalid.as_i32() / 1000, 6);
    }
}
