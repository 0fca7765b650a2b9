use crate::MesaWorld;
use crate::steps::place;
use cucumber::{given, then, when};
use mesa_api::{Favorite, Identity};
use mesa_core::constants::DEFAULT_FAVORITES_KEY;
use mesa_core::{IdentityProvider, LocalDeviceStore};

fn device_favorites(world: &MesaWorld) -> Option<Vec<Favorite>> {
    world
        .harness
        .local
        .get(DEFAULT_FAVORITES_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

#[given("I am not signed in")]
async fn not_signed_in(world: &mut MesaWorld) {
    world.harness.identity.sign_out().await.unwrap();
    world.harness.app.favorites().load().await;
}

#[given(regex = r#"^I am signed in as "([^"]+)"$"#)]
async fn signed_in_as(world: &mut MesaWorld, uid: String) {
    world
        .harness
        .authenticator
        .push(Ok(Identity::authenticated(uid)));
    world.harness.identity.sign_in().await.unwrap();
}

#[given("the cloud is unreachable")]
async fn cloud_unreachable(world: &mut MesaWorld) {
    world.harness.cloud.set_reachable(false);
}

#[given(regex = r#"^"([^"]+)" is one of my favorites$"#)]
async fn already_favorite(world: &mut MesaWorld, id: String) {
    world.harness.app.favorites().add(&place(&id)).await.unwrap();
}

#[when(regex = r#"^I add "([^"]+)" to my favorites$"#)]
async fn add_favorite(world: &mut MesaWorld, id: String) {
    world.harness.app.favorites().add(&place(&id)).await.unwrap();
}

#[when(regex = r#"^I try to add "([^"]+)" to my favorites$"#)]
async fn try_add_favorite(world: &mut MesaWorld, id: String) {
    world.last_result = Some(world.harness.app.favorites().add(&place(&id)).await);
}

#[when(regex = r#"^I remove "([^"]+)" from my favorites$"#)]
async fn remove_favorite(world: &mut MesaWorld, id: String) {
    world.harness.app.favorites().remove(&id).await.unwrap();
}

#[when(regex = r#"^I toggle "([^"]+)"$"#)]
async fn toggle_favorite(world: &mut MesaWorld, id: String) {
    world.harness.app.favorites().toggle(&place(&id)).await.unwrap();
}

#[when("I reload my favorites")]
async fn reload(world: &mut MesaWorld) {
    world.harness.app.favorites().load().await;
}

#[then(regex = r"^I should have (\d+) favorites?$")]
async fn favorite_count(world: &mut MesaWorld, count: usize) {
    assert_eq!(world.harness.app.favorites().len(), count);
}

#[then(regex = r#"^"([^"]+)" should be one of my favorites$"#)]
async fn is_favorite(world: &mut MesaWorld, id: String) {
    assert!(
        world.harness.app.favorites().contains(&id),
        "{} missing from {:?}",
        id,
        world.harness.app.favorites().favorites()
    );
}

#[then(regex = r"^the device should store (\d+) favorites?$")]
async fn device_count(world: &mut MesaWorld, count: usize) {
    let stored = device_favorites(world).unwrap_or_default();
    assert_eq!(stored.len(), count);
}

#[then("the device should hold an empty favorites array")]
async fn device_empty_array(world: &mut MesaWorld) {
    let raw = world.harness.local.get(DEFAULT_FAVORITES_KEY).unwrap();
    assert_eq!(raw.as_deref(), Some("[]"));
}

#[then(regex = r#"^the cloud should store "([^"]+)" for "([^"]+)"$"#)]
async fn cloud_stores(world: &mut MesaWorld, id: String, uid: String) {
    assert!(world.harness.cloud.document(&uid, &id).is_some());
}

#[then("the last error should be recorded")]
async fn last_error_recorded(world: &mut MesaWorld) {
    assert!(world.harness.app.favorites().status().last_error.is_some());
}

#[then("the operation should fail")]
async fn operation_failed(world: &mut MesaWorld) {
    assert!(matches!(world.last_result, Some(Err(_))));
}
