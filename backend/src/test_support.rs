//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The backend forbids direct `std::fs` calls. These helpers wrap
    //! `cap_std::fs::Dir` so test suites share policy-compliant file access.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod memory;

pub mod hasher {
    //! Cheap password hasher for tests.

    use crate::domain::PasswordHash;
    use crate::domain::ports::{PasswordHasher, PasswordHasherError};

    const PREFIX: &str = "plain:";

    /// Stores passwords as `plain:<password>`. Argon2 is far too slow for
    /// suites that register dozens of users.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PlainPasswordHasher;

    impl PasswordHasher for PlainPasswordHasher {
        fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
            Ok(PasswordHash::new(format!("{PREFIX}{password}")))
        }

        fn verify(
            &self,
            password: &str,
            hash: &PasswordHash,
        ) -> Result<bool, PasswordHasherError> {
            hash.as_ref()
                .strip_prefix(PREFIX)
                .map(|stored| stored == password)
                .ok_or_else(|| PasswordHasherError::malformed("missing plain: prefix"))
        }
    }
}

pub mod harness {
    //! Fully wired HTTP state over in-memory repositories.

    use std::path::Path;
    use std::sync::Arc;

    use actix_web::http::header::{AUTHORIZATION, HeaderName};
    use actix_web::web;
    use tempfile::TempDir;
    use zeroize::Zeroizing;

    use super::hasher::PlainPasswordHasher;
    use super::memory::InMemoryStore;
    use crate::domain::ports::{RegisterUserRequest, TokenAuth as _};
    use crate::domain::{
        IngredientService, LoginCredentials, RecipeMarksService, RecipeService,
        ShoppingListService, SubscriptionService, TokenAuthService, UserAccountsService, UserId,
        UserRegistration,
    };
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::outbound::media::FsMediaStore;

    /// Password given to every account created by [`TestBackend::sign_up`].
    pub const TEST_PASSWORD: &str = "bouillabaisse-42";

    /// An account registered and logged in through the services.
    #[derive(Debug, Clone)]
    pub struct SignedUp {
        pub id: UserId,
        pub username: String,
        pub email: String,
        pub token: String,
    }

    impl SignedUp {
        /// `Authorization` header carrying this account's token.
        pub fn authorization(&self) -> (HeaderName, String) {
            (AUTHORIZATION, format!("Token {}", self.token))
        }
    }

    /// Services over one [`InMemoryStore`] with media written to a
    /// temporary directory that lives as long as the backend.
    pub struct TestBackend {
        store: Arc<InMemoryStore>,
        state: web::Data<HttpState>,
        media_root: TempDir,
    }

    impl Default for TestBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestBackend {
        /// # Panics
        ///
        /// Panics when the temporary media directory cannot be created.
        pub fn new() -> Self {
            let media_root = TempDir::new().unwrap_or_else(|err| panic!("media dir: {err}"));
            let media = Arc::new(
                FsMediaStore::open(media_root.path())
                    .unwrap_or_else(|err| panic!("media store: {err}")),
            );
            let store = Arc::new(InMemoryStore::new());
            let hasher = Arc::new(PlainPasswordHasher);

            let ports = HttpStatePorts {
                accounts: Arc::new(UserAccountsService::new(
                    Arc::clone(&store),
                    Arc::clone(&store),
                    hasher.clone(),
                    media.clone(),
                )),
                tokens: Arc::new(TokenAuthService::new(
                    Arc::clone(&store),
                    Arc::clone(&store),
                    hasher,
                )),
                subscriptions: Arc::new(SubscriptionService::new(
                    Arc::clone(&store),
                    Arc::clone(&store),
                    Arc::clone(&store),
                )),
                ingredients: Arc::new(IngredientService::new(Arc::clone(&store))),
                recipes: Arc::new(Self::recipe_service(&store, media.clone())),
                recipes_query: Arc::new(Self::recipe_service(&store, media)),
                marks: Arc::new(RecipeMarksService::new(
                    Arc::clone(&store),
                    Arc::clone(&store),
                )),
                shopping_list: Arc::new(ShoppingListService::new(
                    Arc::clone(&store),
                    Arc::clone(&store),
                )),
            };
            Self {
                store,
                state: web::Data::new(HttpState::new(ports)),
                media_root,
            }
        }

        fn recipe_service(
            store: &Arc<InMemoryStore>,
            media: Arc<FsMediaStore>,
        ) -> RecipeService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>
        {
            RecipeService::new(
                Arc::clone(store),
                Arc::clone(store),
                Arc::clone(store),
                Arc::clone(store),
                Arc::clone(store),
                media,
            )
        }

        pub fn store(&self) -> &InMemoryStore {
            &self.store
        }

        pub fn media_root(&self) -> &Path {
            self.media_root.path()
        }

        /// Handler state, ready for `App::app_data`.
        pub fn data(&self) -> web::Data<HttpState> {
            self.state.clone()
        }

        /// Register `username` with [`TEST_PASSWORD`] and log in.
        ///
        /// # Panics
        ///
        /// Panics when registration or login fails.
        pub async fn sign_up(&self, username: &str) -> SignedUp {
            let email = format!("{username}@example.com");
            let registration =
                UserRegistration::try_from_parts(&email, username, "Test", "Cook")
                    .unwrap_or_else(|err| panic!("registration for {username}: {err}"));
            let user = self
                .state
                .accounts
                .register(RegisterUserRequest {
                    registration,
                    password: Zeroizing::new(TEST_PASSWORD.to_owned()),
                })
                .await
                .unwrap_or_else(|err| panic!("register {username}: {err}"));
            let credentials = LoginCredentials::try_from_parts(&email, TEST_PASSWORD)
                .unwrap_or_else(|err| panic!("credentials for {username}: {err}"));
            let token = self
                .state
                .tokens
                .login(&credentials)
                .await
                .unwrap_or_else(|err| panic!("login {username}: {err}"));
            SignedUp {
                id: user.id,
                username: username.to_owned(),
                email,
                token: token.key().to_owned(),
            }
        }
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.
    //!
    //! Resolves `RefOr<Schema>` wrappers to concrete `Object` schemas with
    //! diagnostic messages on type mismatches.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::AllOf(_)) => {
                panic!("schema '{name}' is an AllOf combinator; inspect composed schemas");
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
