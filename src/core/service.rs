use crate::core::aggregate::{self, RoundingMode};
use crate::core::validator::validate;
use crate::core::Store;
use crate::domain::model::{
    AverageRating, ModuleId, NewRating, ProfessorId, ProfessorListing, Rating, RatingValue,
    RatingView,
};
use crate::domain::ports::IdentityProvider;
use crate::utils::error::Result;
use std::collections::HashMap;

/// The public surface of the rating core: rate, average, list.
pub struct RatingService<S: Store> {
    store: S,
    rounding: RoundingMode,
}

impl<S: Store> RatingService<S> {
    pub fn new(store: S) -> Self {
        Self::with_rounding(store, RoundingMode::default())
    }

    pub fn with_rounding(store: S, rounding: RoundingMode) -> Self {
        Self { store, rounding }
    }

    /// Records a rating for `professor` in `module` on behalf of the session's user.
    ///
    /// Checks run in order: identity, value range, teaching relation. The store
    /// repeats the teaching check inside its atomic insert, so a relation removed
    /// after validation still rejects the write.
    pub async fn create_rating<I: IdentityProvider + ?Sized>(
        &self,
        identity: &I,
        professor: ProfessorId,
        module: ModuleId,
        rating_value: i64,
        comment: Option<String>,
    ) -> Result<Rating> {
        let user = identity.current_user()?;
        let rating = RatingValue::try_from(rating_value)?;
        validate(&self.store, professor, module).await?;

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let stored = self
            .store
            .insert_rating(NewRating {
                user,
                professor,
                module,
                rating,
                comment,
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    "Rating for professor {} in module {} rejected at write: {}",
                    professor,
                    module,
                    e
                )
            })?;

        tracing::info!(
            "Rating {} recorded: {} stars for professor {} in module {} by {}",
            stored.id,
            stored.rating,
            stored.professor,
            stored.module,
            stored.user
        );
        Ok(stored)
    }

    pub async fn average_rating(
        &self,
        professor: ProfessorId,
        module: ModuleId,
    ) -> Result<AverageRating> {
        validate(&self.store, professor, module).await?;
        let ratings = self.store.ratings_for(professor, module).await?;
        tracing::debug!(
            "Averaging {} ratings for professor {} in module {}",
            ratings.len(),
            professor,
            module
        );
        aggregate::average(professor, module, &ratings, self.rounding)
    }

    /// Every professor with the modules they teach, both ordered by id.
    pub async fn list_professors(&self) -> Result<Vec<ProfessorListing>> {
        let professors = self.store.professors().await?;
        let modules = self.store.modules().await?;

        Ok(professors
            .into_iter()
            .map(|professor| ProfessorListing {
                modules: modules
                    .iter()
                    .filter(|m| m.is_taught_by(professor.id))
                    .map(|m| m.summary())
                    .collect(),
                id: professor.id,
                name: professor.name,
            })
            .collect())
    }

    /// All ratings, oldest first.
    pub async fn list_ratings(&self) -> Result<Vec<RatingView>> {
        let professors: HashMap<_, _> = self
            .store
            .professors()
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let modules: HashMap<_, _> = self
            .store
            .modules()
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut views = Vec::new();
        for rating in self.store.ratings().await? {
            let (Some(professor), Some(module)) =
                (professors.get(&rating.professor), modules.get(&rating.module))
            else {
                tracing::warn!(
                    "Skipping rating {} with dangling professor {} or module {}",
                    rating.id,
                    rating.professor,
                    rating.module
                );
                continue;
            };

            views.push(RatingView {
                professor: professor.clone(),
                module: module.summary(),
                rating: rating.rating,
                comment: rating.comment,
                date: rating.created_at,
            });
        }
        Ok(views)
    }
}
