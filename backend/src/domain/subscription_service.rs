//! Following authors.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::error_mapping::field_error;
use crate::domain::ports::{
    RecipeRepository, SubscriptionRepository, Subscriptions, UserRepository,
};
use crate::domain::user_service::page_not_found;
use crate::domain::{Error, SubscriptionView, User, UserId, UserProfile};

/// Authors among `authors` that `viewer` follows. Anonymous viewers follow
/// nobody.
pub async fn subscribed_authors<S>(
    subscriptions: &S,
    viewer: Option<UserId>,
    authors: &[UserId],
) -> Result<HashSet<UserId>, Error>
where
    S: SubscriptionRepository + ?Sized,
{
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if authors.is_empty() {
        return Ok(HashSet::new());
    }
    let followed = subscriptions.subscribed_among(viewer, authors).await?;
    Ok(followed.into_iter().collect())
}

#[derive(Clone)]
pub struct SubscriptionService<U, S, R> {
    users: Arc<U>,
    subscriptions: Arc<S>,
    recipes: Arc<R>,
}

impl<U, S, R> SubscriptionService<U, S, R> {
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, recipes: Arc<R>) -> Self {
        Self {
            users,
            subscriptions,
            recipes,
        }
    }
}

impl<U, S, R> SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn view(
        &self,
        author: User,
        is_subscribed: bool,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionView, Error> {
        let recipes = self
            .recipes
            .summaries_by_author(author.id, recipes_limit)
            .await?;
        let recipes_count = self.recipes.count_by_author(author.id).await?;
        Ok(SubscriptionView {
            author: UserProfile {
                user: author,
                is_subscribed,
            },
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<U, S, R> Subscriptions for SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionView, Error> {
        let author = self
            .users
            .find_by_id(author)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {author} not found")))?;
        if author.id == user {
            return Err(field_error(
                "author",
                "self_subscription",
                "you cannot subscribe to yourself",
            ));
        }
        if !self.subscriptions.add(user, author.id).await? {
            return Err(field_error(
                "author",
                "already_subscribed",
                "you are already subscribed to this user",
            ));
        }
        info!(user_id = %user, author_id = %author.id, "subscribed");
        self.view(author, true, recipes_limit).await
    }

    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error> {
        if self.users.find_by_id(author).await?.is_none() {
            return Err(Error::not_found(format!("user {author} not found")));
        }
        if !self.subscriptions.remove(user, author).await? {
            return Err(field_error(
                "author",
                "not_subscribed",
                "you are not subscribed to this user",
            ));
        }
        info!(user_id = %user, author_id = %author, "unsubscribed");
        Ok(())
    }

    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Page<SubscriptionView>, Error> {
        let total = self.subscriptions.count_authors(user).await?;
        page.ensure_in_range(total).map_err(|_| page_not_found())?;
        let authors = self
            .subscriptions
            .authors(user, page.offset(), page.limit())
            .await?;
        let mut views = Vec::with_capacity(authors.len());
        for author in authors {
            views.push(self.view(author, true, recipes_limit).await?);
        }
        Ok(Page::new(views, total, page))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockRecipeRepository, MockSubscriptionRepository, MockUserRepository,
    };
    use crate::domain::{Email, ErrorCode, PersonName, Username};
    use rstest::rstest;

    fn user(id: i64) -> User {
        User {
            id: UserId::new(id),
            email: Email::new(format!("user{id}@example.com")).expect("valid email"),
            username: Username::new(format!("user{id}")).expect("valid username"),
            first_name: PersonName::new("first_name", "First").expect("valid name"),
            last_name: PersonName::new("last_name", "Last").expect("valid name"),
            avatar: None,
        }
    }

    fn service(
        users: MockUserRepository,
        subscriptions: MockSubscriptionRepository,
        recipes: MockRecipeRepository,
    ) -> SubscriptionService<MockUserRepository, MockSubscriptionRepository, MockRecipeRepository>
    {
        SubscriptionService::new(Arc::new(users), Arc::new(subscriptions), Arc::new(recipes))
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_viewers_follow_nobody() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_subscribed_among().never();
        let followed = subscribed_authors(&subscriptions, None, &[UserId::new(1)])
            .await
            .expect("lookup succeeds");
        assert!(followed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn subscribing_to_self_is_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(user(3))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_add().never();

        let error = service(users, subscriptions, MockRecipeRepository::new())
            .subscribe(UserId::new(3), UserId::new(3), None)
            .await
            .expect_err("self subscription");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_subscription_is_rejected() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(user(4))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_add().return_once(|_, _| Ok(false));

        let error = service(users, subscriptions, MockRecipeRepository::new())
            .subscribe(UserId::new(3), UserId::new(4), None)
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn subscribing_to_unknown_author_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let error = service(
            users,
            MockSubscriptionRepository::new(),
            MockRecipeRepository::new(),
        )
        .subscribe(UserId::new(3), UserId::new(40), None)
        .await
        .expect_err("unknown author");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn subscription_view_counts_all_recipes() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(user(4))));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_add().return_once(|_, _| Ok(true));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_summaries_by_author()
            .withf(|_, limit| *limit == Some(0))
            .return_once(|_, _| Ok(Vec::new()));
        recipes.expect_count_by_author().return_once(|_| Ok(9));

        let view = service(users, subscriptions, recipes)
            .subscribe(UserId::new(3), UserId::new(4), Some(0))
            .await
            .expect("subscribed");
        assert!(view.author.is_subscribed);
        assert!(view.recipes.is_empty());
        assert_eq!(view.recipes_count, 9);
    }
}
