//! Stateful property-based tests for FavoritesStore
//!
//! Random sequences of add/remove/toggle/load interleaved with sign-in and
//! sign-out run against the real store (memory device store + in-memory cloud
//! store) and against a plain reference model. After every step the in-memory
//! view, the local array and the cloud records must match the model.

use super::FavoritesStore;
use crate::identity::{SessionIdentityProvider, StaticAuthenticator};
use crate::storage::MemoryLocalStore;
use mesa_api::{Favorite, Identity, LatLng, Place};
use mesa_core::constants::DEFAULT_FAVORITES_KEY;
use mesa_core::{CloudDocumentStore, IdentityProvider, LocalDeviceStore};
use mesa_firebase::InMemoryDocumentStore;
use proptest::prelude::*;
use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};
use std::collections::BTreeSet;
use std::sync::Arc;

const PLACE_POOL: usize = 4;
const UID: &str = "user-1";

fn place(index: usize) -> Place {
    Place::new(
        format!("place-{index}"),
        format!("Place {index}"),
        "Av. Reforma",
        LatLng::new(19.43 + index as f64 * 0.001, -99.13),
    )
}

#[derive(Debug, Clone)]
enum FavoritesTransition {
    Add(usize),
    Remove(usize),
    Toggle(usize),
    Load,
    SignIn,
    SignOut,
}

#[derive(Debug, Clone, Default)]
struct ReferenceState {
    signed_in: bool,
    /// In-memory view, newest first
    view: Vec<String>,
    /// Local array, newest first
    local: Vec<String>,
    cloud: BTreeSet<String>,
}

impl ReferenceState {
    fn add(&mut self, id: String) {
        if self.view.contains(&id) {
            return;
        }
        if self.signed_in {
            self.cloud.insert(id.clone());
        } else if !self.local.contains(&id) {
            self.local.insert(0, id.clone());
        }
        self.view.insert(0, id);
    }

    fn remove(&mut self, id: &str) {
        if self.signed_in {
            self.cloud.remove(id);
        } else {
            self.local.retain(|x| x != id);
        }
        self.view.retain(|x| x != id);
    }
}

impl ReferenceStateMachine for ReferenceState {
    type State = Self;
    type Transition = FavoritesTransition;

    fn init_state() -> BoxedStrategy<Self::State> {
        Just(ReferenceState::default()).boxed()
    }

    fn transitions(_state: &Self::State) -> BoxedStrategy<Self::Transition> {
        prop_oneof![
            3 => (0..PLACE_POOL).prop_map(FavoritesTransition::Add),
            2 => (0..PLACE_POOL).prop_map(FavoritesTransition::Remove),
            3 => (0..PLACE_POOL).prop_map(FavoritesTransition::Toggle),
            2 => Just(FavoritesTransition::Load),
            1 => Just(FavoritesTransition::SignIn),
            1 => Just(FavoritesTransition::SignOut),
        ]
        .boxed()
    }

    fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
        match transition {
            FavoritesTransition::Add(i) => state.add(place(*i).place_id),
            FavoritesTransition::Remove(i) => state.remove(&place(*i).place_id),
            FavoritesTransition::Toggle(i) => {
                let id = place(*i).place_id;
                if state.view.contains(&id) {
                    state.remove(&id);
                } else {
                    state.add(id);
                }
            }
            FavoritesTransition::Load => {
                state.view = if state.signed_in {
                    state.cloud.iter().cloned().collect()
                } else {
                    state.local.clone()
                };
            }
            FavoritesTransition::SignIn => state.signed_in = true,
            FavoritesTransition::SignOut => state.signed_in = false,
        }
        state
    }
}

struct FavoritesStoreTest {
    runtime: tokio::runtime::Runtime,
    identity: Arc<SessionIdentityProvider>,
    local: Arc<MemoryLocalStore>,
    cloud: Arc<InMemoryDocumentStore>,
    store: Arc<FavoritesStore>,
}

fn ids(favorites: &[Favorite]) -> Vec<String> {
    favorites.iter().map(|f| f.place_id.clone()).collect()
}

impl StateMachineTest for FavoritesStoreTest {
    type SystemUnderTest = Self;
    type Reference = ReferenceState;

    fn init_test(
        _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
    ) -> Self::SystemUnderTest {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let identity = Arc::new(SessionIdentityProvider::new(Arc::new(
            StaticAuthenticator::new(Identity::authenticated(UID)),
        )));
        let local = Arc::new(MemoryLocalStore::new());
        let cloud = Arc::new(InMemoryDocumentStore::new());
        let store = FavoritesStore::builder(identity.clone(), local.clone())
            .cloud(cloud.clone())
            .build();

        FavoritesStoreTest {
            runtime,
            identity,
            local,
            cloud,
            store,
        }
    }

    fn apply(
        state: Self::SystemUnderTest,
        _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        transition: <Self::Reference as ReferenceStateMachine>::Transition,
    ) -> Self::SystemUnderTest {
        let store = state.store.clone();
        state.runtime.block_on(async {
            match transition {
                FavoritesTransition::Add(i) => store.add(&place(i)).await.unwrap(),
                FavoritesTransition::Remove(i) => {
                    store.remove(&place(i).place_id).await.unwrap()
                }
                FavoritesTransition::Toggle(i) => {
                    let was = store.contains(&place(i).place_id);
                    let now = store.toggle(&place(i)).await.unwrap();
                    assert_eq!(now, !was);
                }
                FavoritesTransition::Load => {
                    store.load().await;
                }
                FavoritesTransition::SignIn => {
                    state.identity.sign_in().await.unwrap();
                }
                FavoritesTransition::SignOut => state.identity.sign_out().await.unwrap(),
            }
        });
        state
    }

    fn check_invariants(
        state: &Self::SystemUnderTest,
        ref_state: &<Self::Reference as ReferenceStateMachine>::State,
    ) {
        let view = ids(&state.store.favorites());

        let unique: BTreeSet<&String> = view.iter().collect();
        assert_eq!(unique.len(), view.len(), "duplicate place ids in {:?}", view);

        // Cloud listings order by save time, which ties within a clock tick
        let view_set: BTreeSet<String> = view.iter().cloned().collect();
        let ref_view_set: BTreeSet<String> = ref_state.view.iter().cloned().collect();
        assert_eq!(view_set, ref_view_set);

        let local = state
            .local
            .get(DEFAULT_FAVORITES_KEY)
            .unwrap()
            .map(|raw| ids(&serde_json::from_str::<Vec<Favorite>>(&raw).unwrap()))
            .unwrap_or_default();
        assert_eq!(local, ref_state.local);

        let cloud: BTreeSet<String> = state
            .runtime
            .block_on(state.cloud.list_ordered_by_saved_at_desc(UID))
            .unwrap()
            .into_iter()
            .map(|f| f.place_id)
            .collect();
        assert_eq!(cloud, ref_state.cloud);

        assert_eq!(
            state.identity.current_identity().is_authenticated(),
            ref_state.signed_in
        );
    }
}

proptest_state_machine::prop_state_machine! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn test_favorites_store_state_machine(sequential 1..30 => FavoritesStoreTest);
}
