use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,    // 学生
    Faculty,    // 任课教师
    Registrar,  // 教务审核员
    SuperAdmin, // 超级管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const FACULTY: &'static str = "faculty";
    pub const REGISTRAR: &'static str = "registrar";
    pub const SUPER_ADMIN: &'static str = "super_admin";

    /// 有权审核成绩提交的角色
    pub fn reviewer_roles() -> &'static [&'static UserRole] {
        &[&Self::Registrar, &Self::SuperAdmin]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, faculty, registrar, super_admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Faculty => write!(f, "{}", UserRole::FACULTY),
            UserRole::Registrar => write!(f, "{}", UserRole::REGISTRAR),
            UserRole::SuperAdmin => write!(f, "{}", UserRole::SUPER_ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::FACULTY => Ok(UserRole::Faculty),
            UserRole::REGISTRAR => Ok(UserRole::Registrar),
            UserRole::SUPER_ADMIN => Ok(UserRole::SuperAdmin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 列表展示用的用户摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
}

impl UserSummary {
    /// 用户记录缺失时的占位
    pub fn unknown(id: i64) -> Self {
        Self {
            id,
            username: "unknown".to_string(),
            full_name: None,
        }
    }
}

/// 通过令牌校验的调用者身份，由 RequireJWT 写入请求扩展
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub role: UserRole,
}
