//! Inventory change events.

use serde::{Deserialize, Serialize};

use storefront_events::Event;

/// Immutable fact produced once per successful stock mutation.
///
/// The first mutation for a product yields `Created`; every subsequent one
/// yields `Updated` with the signed delta against the snapshot read just
/// before the upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryChangeEvent {
    Created {
        product_id: String,
        quantity: i64,
    },
    Updated {
        product_id: String,
        previous_quantity: i64,
        new_quantity: i64,
        change: i64,
    },
}

impl Event for InventoryChangeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryChangeEvent::Created { .. } => "inventory.created",
            InventoryChangeEvent::Updated { .. } => "inventory.updated",
        }
    }
}

/// Build the event for a mutation given the pre-upsert snapshot.
pub fn change_event(
    product_id: &str,
    previous_quantity: Option<i64>,
    new_quantity: i64,
) -> InventoryChangeEvent {
    match previous_quantity {
        Some(previous) => InventoryChangeEvent::Updated {
            product_id: product_id.to_string(),
            previous_quantity: previous,
            new_quantity,
            change: new_quantity - previous,
        },
        None => InventoryChangeEvent::Created {
            product_id: product_id.to_string(),
            quantity: new_quantity,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_mutation_is_created() {
        let event = change_event("prod-1", None, 10);
        assert_eq!(
            event,
            InventoryChangeEvent::Created {
                product_id: "prod-1".to_string(),
                quantity: 10,
            }
        );
        assert_eq!(event.event_type(), "inventory.created");
    }

    #[test]
    fn serialized_events_are_tagged() {
        let value = serde_json::to_value(change_event("prod-1", Some(10), 7)).unwrap();
        assert_eq!(value["kind"], "updated");
        assert_eq!(value["change"], -3);
    }

    proptest! {
        #[test]
        fn updated_delta_is_new_minus_previous(q0 in 0i64..1_000_000, q1 in 0i64..1_000_000) {
            match change_event("p", Some(q0), q1) {
                InventoryChangeEvent::Updated { previous_quantity, new_quantity, change, .. } => {
                    prop_assert_eq!(previous_quantity, q0);
                    prop_assert_eq!(new_quantity, q1);
                    prop_assert_eq!(change, q1 - q0);
                }
                other => panic!("expected Updated, got {other:?}"),
            }
        }
    }
}
