//! Property tests: random operation sequences against an in-memory shop.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use rocket_shoes_cart::{
    CartServices, CartStore, DurableStore, MemoryStore, MutationOutcome, RecordingNotifier,
};
use rocket_shoes_core::{Cart, ProductId};
use rocket_shoes_integration_tests::{FakeShop, TEST_KEY};

#[derive(Debug, Clone)]
enum Op {
    Add(i64),
    Remove(i64),
    Update(i64, i64),
    Restock(i64, u32),
}

fn op() -> impl Strategy<Value = Op> {
    // Ids 1..=4 are stocked, 5 is unknown to the shop.
    let id = 1_i64..=5;
    prop_oneof![
        4 => id.clone().prop_map(Op::Add),
        2 => id.clone().prop_map(Op::Remove),
        3 => (id, -2_i64..=6).prop_map(|(id, amount)| Op::Update(id, amount)),
        1 => (1_i64..=4, 0_u32..=4).prop_map(|(id, amount)| Op::Restock(id, amount)),
    ]
}

struct World {
    store: CartStore,
    shop: Arc<FakeShop>,
    storage: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

impl World {
    fn new(initial_stock: &[u32]) -> Self {
        let shop = Arc::new(FakeShop::new());
        for (id, amount) in (1_i64..).zip(initial_stock) {
            shop.set_stock(id, *amount);
        }
        let storage = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let services = CartServices {
            inventory: shop.clone(),
            catalog: shop.clone(),
            storage: storage.clone(),
            notifier: notifier.clone(),
        };

        Self {
            store: CartStore::load(services, TEST_KEY),
            shop,
            storage,
            notifier,
        }
    }

    fn blob(&self) -> Option<String> {
        self.storage.get(TEST_KEY).unwrap()
    }

    fn amount_of(&self, id: i64) -> Option<u32> {
        self.store
            .cart()
            .get(ProductId::new(id))
            .map(|product| product.amount.get())
    }
}

fn assert_well_formed(cart: &Cart) {
    let mut ids: Vec<i64> = cart.iter().map(|p| p.id().as_i64()).collect();
    assert!(cart.iter().all(|p| p.amount.get() >= 1));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), cart.len(), "duplicate id in {cart:?}");
}

/// Apply `op` and check the per-operation guarantees.
async fn step(world: &mut World, op: &Op) {
    let before_cart = world.store.cart().clone();
    let before_blob = world.blob();
    let before_notes = world.notifier.len();

    let outcome = match *op {
        Op::Restock(id, amount) => {
            world.shop.set_stock(id, amount);
            return;
        }
        Op::Add(id) => {
            let observed = world.shop.stock_of(id);
            let outcome = world.store.add_product(ProductId::new(id)).await;
            if outcome.is_committed() {
                let amount = world.amount_of(id).unwrap();
                assert!(amount <= observed.unwrap(), "added past stock");
                assert_eq!(amount, before_cart.get(ProductId::new(id)).map_or(1, |p| p.amount.get() + 1));
            }
            outcome
        }
        Op::Remove(id) => {
            let present = before_cart.contains(ProductId::new(id));
            let outcome = world.store.remove_product(ProductId::new(id));
            assert_eq!(outcome.is_committed(), present);
            outcome
        }
        Op::Update(id, amount) => {
            let outcome = world.store.update_product_amount(ProductId::new(id), amount).await;
            if amount <= 0 {
                assert_eq!(outcome, MutationOutcome::Ignored);
            }
            if outcome.is_committed() {
                assert_eq!(i64::from(world.amount_of(id).unwrap()), amount);
            }
            outcome
        }
    };

    assert_well_formed(world.store.cart());
    match outcome {
        MutationOutcome::Committed => {
            let stored: Cart = serde_json::from_str(&world.blob().unwrap()).unwrap();
            assert_eq!(&stored, world.store.cart());
            assert_eq!(world.notifier.len(), before_notes);
        }
        MutationOutcome::Rejected => {
            assert_eq!(world.store.cart(), &before_cart);
            assert_eq!(
                serde_json::to_string(world.store.cart()).unwrap(),
                serde_json::to_string(&before_cart).unwrap()
            );
            assert_eq!(world.blob(), before_blob);
            assert_eq!(world.notifier.len(), before_notes + 1);
        }
        MutationOutcome::Ignored => {
            assert_eq!(world.store.cart(), &before_cart);
            assert_eq!(world.blob(), before_blob);
            assert_eq!(world.notifier.len(), before_notes);
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_operation_sequences_keep_cart_consistent(
        initial_stock in proptest::collection::vec(0_u32..=4, 4),
        ops in proptest::collection::vec(op(), 1..40),
    ) {
        runtime().block_on(async {
            let mut world = World::new(&initial_stock);
            for op in &ops {
                step(&mut world, op).await;
            }
        });
    }

    #[test]
    fn prop_stored_cart_reloads_identically(
        ops in proptest::collection::vec(op(), 1..20),
    ) {
        let rt = runtime();
        let world = rt.block_on(async {
            let mut world = World::new(&[3, 3, 3, 3]);
            for op in &ops {
                step(&mut world, op).await;
            }
            world
        });

        let reloaded = CartStore::load(
            CartServices {
                inventory: world.shop.clone(),
                catalog: world.shop.clone(),
                storage: world.storage.clone(),
                notifier: Arc::new(RecordingNotifier::new()),
            },
            TEST_KEY,
        );
        prop_assert_eq!(reloaded.cart(), world.store.cart());
    }

    #[test]
    fn prop_non_positive_update_is_silent(
        amount in i64::MIN..=0,
        seeded in 1_u32..=4,
    ) {
        runtime().block_on(async {
            let mut world = World::new(&[4]);
            for _ in 0..seeded {
                world.store.add_product(ProductId::new(1)).await;
            }
            let before = world.store.cart().clone();

            let outcome = world.store.update_product_amount(ProductId::new(1), amount).await;

            assert_eq!(outcome, MutationOutcome::Ignored);
            assert_eq!(world.store.cart(), &before);
            assert!(world.notifier.is_empty());
        });
    }

    #[test]
    fn prop_removing_absent_product_notifies_once(
        present in proptest::collection::btree_set(1_i64..=4, 0..4),
        absent in 5_i64..=100,
    ) {
        runtime().block_on(async {
            let mut world = World::new(&[1, 1, 1, 1]);
            for id in &present {
                world.store.add_product(ProductId::new(*id)).await;
            }
            let before = serde_json::to_string(world.store.cart()).unwrap();

            let outcome = world.store.remove_product(ProductId::new(absent));

            assert_eq!(outcome, MutationOutcome::Rejected);
            assert_eq!(serde_json::to_string(world.store.cart()).unwrap(), before);
            assert_eq!(world.notifier.len(), 1);
        });
    }
}
