use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use stockledger_core::ProductId;
use stockledger_events::{EventBus, InMemoryEventBus, Subscription};
use stockledger_inventory::Movement;
use stockledger_products::{Product, ValidatedProduct};

use super::r#trait::{ProductChange, ProductStore, ProductUpdate, StoreError};

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, Product>,
    movements: Vec<Movement>,
}

impl State {
    fn name_taken(&self, name: &str, except: Option<ProductId>) -> bool {
        self.products
            .values()
            .any(|p| Some(p.id) != except && p.name == name)
    }
}

/// In-memory product store.
///
/// Intended for tests/dev and single-process deployments. Mirrors the constraints of the
/// Postgres schema (unique names, non-negative stock) and publishes a [`ProductChange`]
/// after every successful write.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<State>,
    changes: InMemoryEventBus<ProductChange>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive a [`ProductChange`] for every write made after this call.
    pub fn subscribe(&self) -> Subscription<ProductChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: ProductChange) {
        if let Err(err) = self.changes.publish(change) {
            tracing::warn!(error = ?err, "failed to publish product change");
        }
    }

    fn read(&self, operation: &'static str) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::unavailable(operation, "state lock poisoned"))
    }

    fn write(&self, operation: &'static str) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::unavailable(operation, "state lock poisoned"))
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.read("list")?;
        Ok(state.products.values().cloned().collect())
    }

    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let state = self.read("get")?;
        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn create(&self, fields: &ValidatedProduct) -> Result<Product, StoreError> {
        let product = {
            let mut state = self.write("create")?;
            if state.name_taken(fields.name(), None) {
                return Err(StoreError::conflict(
                    "create",
                    format!("name '{}' already exists", fields.name()),
                ));
            }
            if fields.stock() < 0 {
                return Err(StoreError::conflict("create", "stock cannot be negative"));
            }

            let product = Product::from_validated(ProductId::new(), fields, Utc::now());
            state.products.insert(product.id, product.clone());
            product
        };

        self.publish(ProductChange::Created(product.clone()));
        Ok(product)
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StoreError> {
        let product = {
            let mut state = self.write("update")?;
            if !state.products.contains_key(&id) {
                return Err(StoreError::not_found(id));
            }

            let updated = match update {
                ProductUpdate::Replace(fields) => {
                    if state.name_taken(fields.name(), Some(id)) {
                        return Err(StoreError::conflict(
                            "update",
                            format!("name '{}' already exists", fields.name()),
                        ));
                    }
                    Product::from_validated(id, &fields, Utc::now())
                }
                ProductUpdate::Stock { expected, new } => {
                    if new < 0 {
                        return Err(StoreError::conflict(
                            "update",
                            format!("stock of {id} cannot be set to {new}"),
                        ));
                    }
                    let mut current = state.products[&id].clone();
                    if current.stock != expected {
                        return Err(StoreError::conflict(
                            "update",
                            format!("stock of {id} is {} (expected {expected})", current.stock),
                        ));
                    }
                    current.stock = new;
                    current.updated_at = Utc::now();
                    current
                }
            };

            state.products.insert(id, updated.clone());
            updated
        };

        self.publish(ProductChange::Updated(product.clone()));
        Ok(product)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        {
            let mut state = self.write("delete")?;
            if state.products.remove(&id).is_none() {
                return Err(StoreError::not_found(id));
            }
        }

        self.publish(ProductChange::Deleted {
            id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    fn append_movement(&self, movement: &Movement) -> Result<(), StoreError> {
        let mut state = self.write("append_movement")?;
        state.movements.push(movement.clone());
        Ok(())
    }

    fn movements(&self, product_id: ProductId) -> Result<Vec<Movement>, StoreError> {
        let state = self.read("movements")?;
        let mut movements: Vec<Movement> = state
            .movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect();
        // Stable sort keeps append order for equal timestamps.
        movements.sort_by_key(|m| m.occurred_at);
        Ok(movements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stockledger_core::{Money, MovementId};
    use stockledger_inventory::MovementKind;
    use stockledger_products::{ProductDraft, ValidationPolicy, validate_new};

    fn fields(name: &str, stock: i64) -> ValidatedProduct {
        let draft = ProductDraft::new(name, stock, Money::from_cents(500), Money::from_cents(300));
        validate_new(&draft, Vec::<String>::new(), &ValidationPolicy::default()).unwrap()
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let store = InMemoryProductStore::new();
        let a = store.create(&fields("A", 1)).unwrap();
        let b = store.create(&fields("B", 1)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().unwrap().len(), 2);
        assert_eq!(store.get(a.id).unwrap(), a);
    }

    #[test]
    fn unique_name_constraint_is_enforced_by_the_store() {
        let store = InMemoryProductStore::new();
        store.create(&fields("Widget", 1)).unwrap();
        let err = store.create(&fields("Widget", 2)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { operation: "create", .. }));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn replace_keeps_identity_and_checks_other_names() {
        let store = InMemoryProductStore::new();
        let widget = store.create(&fields("Widget", 1)).unwrap();
        store.create(&fields("Gadget", 1)).unwrap();

        let renamed = store
            .update(widget.id, ProductUpdate::Replace(fields("Sprocket", 4)))
            .unwrap();
        assert_eq!(renamed.id, widget.id);
        assert_eq!(renamed.name, "Sprocket");
        assert_eq!(renamed.stock, 4);

        let same_name = store.update(widget.id, ProductUpdate::Replace(fields("Sprocket", 5)));
        assert!(same_name.is_ok());

        let clash = store.update(widget.id, ProductUpdate::Replace(fields("Gadget", 5)));
        assert!(matches!(clash, Err(StoreError::Conflict { .. })));
    }

    #[test]
    fn stock_update_rejects_negative_levels() {
        let store = InMemoryProductStore::new();
        let widget = store.create(&fields("Widget", 1)).unwrap();
        assert!(matches!(
            store.update(widget.id, ProductUpdate::Stock { expected: 1, new: -1 }),
            Err(StoreError::Conflict { .. })
        ));
        assert_eq!(store.get(widget.id).unwrap().stock, 1);
    }

    #[test]
    fn stock_update_requires_the_expected_level() {
        let store = InMemoryProductStore::new();
        let widget = store.create(&fields("Widget", 10)).unwrap();
        store
            .update(widget.id, ProductUpdate::Stock { expected: 10, new: 7 })
            .unwrap();

        let stale = store.update(widget.id, ProductUpdate::Stock { expected: 10, new: 7 });
        assert!(matches!(stale, Err(StoreError::Conflict { operation: "update", .. })));
        assert_eq!(store.get(widget.id).unwrap().stock, 7);
    }

    #[test]
    fn missing_rows_report_not_found() {
        let store = InMemoryProductStore::new();
        let id = ProductId::new();
        assert_eq!(store.get(id), Err(StoreError::not_found(id)));
        assert_eq!(store.update(id, ProductUpdate::Stock { expected: 0, new: 1 }), Err(StoreError::not_found(id)));
        assert_eq!(store.delete(id), Err(StoreError::not_found(id)));
    }

    #[test]
    fn writes_are_published_to_subscribers() {
        let store = InMemoryProductStore::new();
        let changes = store.subscribe();

        let widget = store.create(&fields("Widget", 1)).unwrap();
        store
            .update(widget.id, ProductUpdate::Stock { expected: 1, new: 3 })
            .unwrap();
        store.delete(widget.id).unwrap();

        let seen = changes.drain();
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], ProductChange::Created(_)));
        assert!(matches!(&seen[1], ProductChange::Updated(p) if p.stock == 3));
        assert!(matches!(seen[2], ProductChange::Deleted { id, .. } if id == widget.id));
        assert_eq!(
            seen.iter().map(ProductChange::kind).collect::<Vec<_>>(),
            vec!["created", "updated", "deleted"]
        );
        assert!(seen.iter().all(|c| c.product_id() == widget.id));
    }

    #[test]
    fn failed_writes_are_not_published() {
        let store = InMemoryProductStore::new();
        store.create(&fields("Widget", 1)).unwrap();
        let changes = store.subscribe();

        let _ = store.create(&fields("Widget", 1));
        let _ = store.delete(ProductId::new());

        assert!(changes.drain().is_empty());
    }

    #[test]
    fn movements_are_filtered_and_ordered_by_time() {
        let store = InMemoryProductStore::new();
        let product_id = ProductId::new();
        let other = ProductId::new();
        let now = Utc::now();

        let movement = |pid, minutes| Movement {
            id: MovementId::new(),
            product_id: pid,
            kind: MovementKind::Inbound,
            quantity: 1,
            note: None,
            occurred_at: now + Duration::minutes(minutes),
        };

        store.append_movement(&movement(product_id, 5)).unwrap();
        store.append_movement(&movement(other, 0)).unwrap();
        store.append_movement(&movement(product_id, 1)).unwrap();

        let history = store.movements(product_id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].occurred_at < history[1].occurred_at);
    }
}
