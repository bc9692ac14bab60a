//! Read/write permission policies for API resources.
//!
//! Every handler that mutates a resource evaluates one of the [`Policy`]
//! variants twice: once at the request level before anything is loaded, and
//! once against the loaded object when the write targets an existing row.
//! Both levels agree on anonymous callers, so an anonymous write is rejected
//! as unauthenticated whether or not the target exists.

use http::Method;
use uuid::Uuid;

/// The identity a request is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User { id: Uuid, is_admin: bool },
}

impl Actor {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::Anonymous => None,
            Actor::User { id, .. } => Some(*id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::User { is_admin: true, .. })
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Actor::Anonymous)
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// No identity was presented for an action that needs one.
    Unauthenticated,
    /// An identity was presented but lacks the capability.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Everyone may read, only administrators may write (tags, ingredients).
    AdminOrReadOnly,
    /// Everyone may read, authenticated users may create, and only the
    /// author or an administrator may modify an existing object (recipes).
    AuthorOrAdminOrReadOnly,
}

/// GET, HEAD and OPTIONS never modify state.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

impl Policy {
    /// Check performed before any object has been loaded.
    pub fn check_request(self, method: &Method, actor: &Actor) -> Result<(), Denied> {
        if is_safe_method(method) {
            return Ok(());
        }
        if !actor.is_authenticated() {
            return Err(Denied::Unauthenticated);
        }
        match self {
            Policy::AdminOrReadOnly if !actor.is_admin() => Err(Denied::Forbidden),
            _ => Ok(()),
        }
    }

    /// Check performed against an existing object owned by `author_id`.
    pub fn check_object(
        self,
        method: &Method,
        actor: &Actor,
        author_id: Uuid,
    ) -> Result<(), Denied> {
        self.check_request(method, actor)?;
        if is_safe_method(method) {
            return Ok(());
        }
        match self {
            Policy::AdminOrReadOnly => Ok(()),
            Policy::AuthorOrAdminOrReadOnly => {
                if actor.is_admin() || actor.user_id() == Some(author_id) {
                    Ok(())
                } else {
                    Err(Denied::Forbidden)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Uuid) -> Actor {
        Actor::User {
            id,
            is_admin: false,
        }
    }

    fn admin() -> Actor {
        Actor::User {
            id: Uuid::new_v4(),
            is_admin: true,
        }
    }

    #[test]
    fn anonymous_read_is_allowed() {
        let author = Uuid::new_v4();
        let policy = Policy::AuthorOrAdminOrReadOnly;
        assert_eq!(policy.check_request(&Method::GET, &Actor::Anonymous), Ok(()));
        assert_eq!(
            policy.check_object(&Method::GET, &Actor::Anonymous, author),
            Ok(())
        );
    }

    #[test]
    fn anonymous_write_is_unauthenticated_at_both_levels() {
        let author = Uuid::new_v4();
        let policy = Policy::AuthorOrAdminOrReadOnly;
        for method in [Method::POST, Method::PATCH, Method::PUT, Method::DELETE] {
            assert_eq!(
                policy.check_request(&method, &Actor::Anonymous),
                Err(Denied::Unauthenticated)
            );
            assert_eq!(
                policy.check_object(&method, &Actor::Anonymous, author),
                Err(Denied::Unauthenticated)
            );
        }
    }

    #[test]
    fn non_author_cannot_patch() {
        let author = Uuid::new_v4();
        let stranger = user(Uuid::new_v4());
        let policy = Policy::AuthorOrAdminOrReadOnly;
        assert_eq!(policy.check_request(&Method::PATCH, &stranger), Ok(()));
        assert_eq!(
            policy.check_object(&Method::PATCH, &stranger, author),
            Err(Denied::Forbidden)
        );
        assert_eq!(
            policy.check_object(&Method::DELETE, &stranger, author),
            Err(Denied::Forbidden)
        );
    }

    #[test]
    fn author_can_patch_own_recipe() {
        let author = Uuid::new_v4();
        let policy = Policy::AuthorOrAdminOrReadOnly;
        assert_eq!(
            policy.check_object(&Method::PATCH, &user(author), author),
            Ok(())
        );
    }

    #[test]
    fn admin_can_patch_any_recipe() {
        let author = Uuid::new_v4();
        let policy = Policy::AuthorOrAdminOrReadOnly;
        assert_eq!(policy.check_object(&Method::PATCH, &admin(), author), Ok(()));
        assert_eq!(policy.check_object(&Method::DELETE, &admin(), author), Ok(()));
    }

    #[test]
    fn authenticated_user_can_create() {
        let policy = Policy::AuthorOrAdminOrReadOnly;
        assert_eq!(
            policy.check_request(&Method::POST, &user(Uuid::new_v4())),
            Ok(())
        );
    }

    #[test]
    fn admin_or_read_only_restricts_writes_to_admins() {
        let policy = Policy::AdminOrReadOnly;
        assert_eq!(policy.check_request(&Method::GET, &Actor::Anonymous), Ok(()));
        assert_eq!(
            policy.check_request(&Method::POST, &Actor::Anonymous),
            Err(Denied::Unauthenticated)
        );
        assert_eq!(
            policy.check_request(&Method::POST, &user(Uuid::new_v4())),
            Err(Denied::Forbidden)
        );
        assert_eq!(policy.check_request(&Method::DELETE, &admin()), Ok(()));
    }

    #[test]
    fn head_and_options_are_safe() {
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::PATCH));
    }
}
