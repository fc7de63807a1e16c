//! Legal-entity providers double as hosting legal entities
//!
//! An approved, active provider flagged as a legal entity gets an entry in
//! the "Provider hosting legal entity" vocabulary, matched by name ignoring
//! case.

use catalogue_common::text::sanitize;
use mediator::Request;

use crate::api::AppState;
use crate::domain::states::{vocabulary_type, PROVIDER_STATES};
use crate::domain::{ProviderBundle, Vocabulary};
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

const PARENT: &str = "provider_hosting_legal_entity";

#[derive(Debug, Clone, Default)]
pub struct UpdateHostingLegalEntitiesCommand;

impl Request<CatalogueResult<usize>> for UpdateHostingLegalEntitiesCommand {}

async fn known_names(state: &AppState) -> CatalogueResult<Vec<String>> {
    let filter = FacetFilter::all().with_filter("type", vocabulary_type::PROVIDER_HOSTING_LEGAL_ENTITY);
    Ok(state
        .repos
        .vocabularies()
        .all(&filter)
        .await?
        .into_iter()
        .map(|v| v.name.to_lowercase())
        .collect())
}

fn qualifies(provider: &ProviderBundle) -> bool {
    provider.payload.legal_entity && provider.active && provider.is_approved() && !provider.is_published()
}

/// `provider_hosting_legal_entity-{sanitized name}`
pub fn entity_id(name: &str) -> String {
    format!("{}-{}", PARENT, sanitize(name))
}

/// Adds the entry unless its id is already taken
async fn add_entity(state: &AppState, provider: &ProviderBundle) -> CatalogueResult<bool> {
    let name = provider.name();
    let mut vocabulary = Vocabulary::new(
        &entity_id(name),
        name,
        vocabulary_type::PROVIDER_HOSTING_LEGAL_ENTITY,
    );
    if let Some(catalogue_id) = provider.payload.catalogue_id.as_deref() {
        vocabulary = vocabulary.with_extra("catalogueId", catalogue_id);
    }
    let repo = state.repos.vocabularies();
    if repo.exists(&vocabulary.id).await? {
        tracing::debug!(id = %vocabulary.id, "Hosting legal entity already present");
        return Ok(false);
    }
    repo.add(&vocabulary).await?;
    tracing::info!(id = %vocabulary.id, provider = %provider.id, "Hosting legal entity added");
    Ok(true)
}

/// Add `provider` to the hosting legal entities when it qualifies and its
/// name is missing there
pub async fn register(state: &AppState, provider: &ProviderBundle) -> CatalogueResult<bool> {
    if !qualifies(provider) {
        return Ok(false);
    }
    let known = known_names(state).await?;
    if known.contains(&provider.name().to_lowercase()) {
        return Ok(false);
    }
    add_entity(state, provider).await
}

/// Catch up every qualifying provider, returning how many were added
#[tracing::instrument(skip(state, auth, _command), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    _command: UpdateHostingLegalEntitiesCommand,
) -> CatalogueResult<usize> {
    auth.require_admin()?;
    let filter = FacetFilter::all()
        .with_filter("status", PROVIDER_STATES.approved)
        .with_filter("active", "true")
        .with_filter("legal_entity", "true")
        .with_filter("published", "false");
    let mut known = known_names(state).await?;
    let mut added = 0;
    for provider in state.repos.providers().all(&filter).await? {
        let name = provider.name().to_lowercase();
        if known.contains(&name) {
            continue;
        }
        if add_entity(state, &provider).await? {
            added += 1;
        }
        known.push(name);
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_catch_up_adds_missing_entities() {
        let ctx = TestContext::new().await;
        for abbreviation in ["ATHENA", "HERMES"] {
            let mut provider = ctx.approved_provider(abbreviation).await;
            provider.payload.legal_entity = true;
            ctx.state.repos.providers().update(&provider).await.unwrap();
        }
        ctx.state
            .repos
            .vocabularies()
            .add(&Vocabulary::new(
                "provider_hosting_legal_entity-athena",
                "athena institute",
                vocabulary_type::PROVIDER_HOSTING_LEGAL_ENTITY,
            ))
            .await
            .unwrap();

        let added = handle(&ctx.state, &TestContext::admin(), UpdateHostingLegalEntitiesCommand)
            .await
            .unwrap();
        assert_eq!(added, 1);
        assert!(ctx
            .state
            .repos
            .vocabularies()
            .exists("provider_hosting_legal_entity-hermes_institute")
            .await
            .unwrap());
        assert_eq!(
            handle(&ctx.state, &TestContext::admin(), UpdateHostingLegalEntitiesCommand)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_entity_ids_are_sanitized_and_never_overwritten() {
        let ctx = TestContext::new().await;
        let mut provider = ctx.approved_provider("ATHENA").await;
        provider.payload.name = "Athena R.C. / Data".into();
        provider.payload.legal_entity = true;
        ctx.state.repos.providers().update(&provider).await.unwrap();

        assert!(register(&ctx.state, &provider).await.unwrap());
        let entity = ctx
            .state
            .repos
            .vocabularies()
            .get_required("provider_hosting_legal_entity-athena_rc_data")
            .await
            .unwrap();
        assert_eq!(entity.name, "Athena R.C. / Data");
        assert_eq!(entity.extras.get("catalogueId").map(String::as_str), Some("eosc"));

        let mut curated = entity.clone();
        curated.name = "Athena Research Center".into();
        ctx.state.repos.vocabularies().update(&curated).await.unwrap();

        assert!(!register(&ctx.state, &provider).await.unwrap());
        let kept = ctx
            .state
            .repos
            .vocabularies()
            .get_required("provider_hosting_legal_entity-athena_rc_data")
            .await
            .unwrap();
        assert_eq!(kept.name, "Athena Research Center");
    }
}
