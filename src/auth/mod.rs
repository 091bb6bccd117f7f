//! Authentication and authorization module

pub mod credentials;
pub mod guard;
pub mod identity;
pub mod keygen;
pub mod keys;
pub mod service;
pub mod token;
pub mod user;

// Re-export main components
pub use credentials::CredentialService;
pub use guard::{Guard, Guards, PermissionGate, RoleGate};
pub use identity::{extract_bearer_token, Identity, IdentityResolver};
pub use keygen::generate_key_pair;
pub use keys::KeyStore;
pub use service::{AuthService, AuthTokens};
pub use token::{Claims, TokenService};
pub use user::{Credential, Permission, Role, User, UserWithRoles};
