//! 认证授权模块
//!
//! 身份由上游认证服务签发的 JWT 提供；本服务只验证令牌并信任其中的
//! 员工俱乐部集合，不重新推导角色。
//!
//! - [`JwtService`] - JWT 令牌验证
//! - [`CurrentUser`] - 当前用户上下文 (axum extractor)

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};

/// Verified caller identity, extracted from the JWT claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub full_name: String,
    /// Clubs where this user acts as staff
    pub staff_clubs: Vec<i64>,
    /// Back-office admin: staff everywhere
    pub admin: bool,
}

impl CurrentUser {
    pub fn is_staff_for(&self, club_id: i64) -> bool {
        self.admin || self.staff_clubs.contains(&club_id)
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("Invalid subject claim: {}", claims.sub))?;
        Ok(Self {
            id,
            full_name: claims.full_name,
            staff_clubs: claims.staff_clubs,
            admin: claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_check_covers_admin_and_listed_clubs() {
        let staff = CurrentUser {
            id: 1,
            full_name: "Front Desk".into(),
            staff_clubs: vec![10, 20],
            admin: false,
        };
        assert!(staff.is_staff_for(10));
        assert!(!staff.is_staff_for(30));

        let admin = CurrentUser {
            id: 2,
            full_name: "Owner".into(),
            staff_clubs: vec![],
            admin: true,
        };
        assert!(admin.is_staff_for(30));
    }
}
