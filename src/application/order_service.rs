use chrono::Duration;

use crate::domain::errors::OrderError;
use crate::domain::order::{
    ListResult, Order, OrderId, OrderLine, OrderStatus, ReturnApproval, ReturnId, ReturnReason,
    ShippingAddress,
};
use crate::domain::policy;
use crate::domain::ports::{Clock, OrderStore};

pub const MAX_PAGE_SIZE: usize = 100;

pub struct OrderService<R, C> {
    repo: R,
    clock: C,
}

impl<R: OrderStore, C: Clock> OrderService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn place_order(
        &self,
        items: Vec<OrderLine>,
        shipping_address: ShippingAddress,
    ) -> Result<Order, OrderError> {
        let order = Order::new(
            OrderId::generate(),
            items,
            shipping_address,
            self.clock.now(),
        )?;
        self.repo.insert(order.clone())?;
        log::info!(
            "Placed order {} for {} ({} lines)",
            order.id(),
            order.total_amount(),
            order.items().len()
        );
        Ok(order)
    }

    pub fn get_order_details(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.repo.get(id)?.ok_or(OrderError::NotFound)
    }

    pub fn list_orders(&self, page: usize, limit: usize) -> Result<ListResult, OrderError> {
        Ok(self
            .repo
            .list(page.max(1), limit.clamp(1, MAX_PAGE_SIZE))?)
    }

    pub fn update_shipping_address(
        &self,
        id: &OrderId,
        new_address: ShippingAddress,
    ) -> Result<Order, OrderError> {
        new_address.validate().inspect_err(|e| {
            log::debug!("Rejected address change for order {}: {}", id, e);
        })?;

        let updated = self
            .repo
            .update(id, &mut |order| {
                policy::ensure_modifiable(order)?;
                order.set_shipping_address(new_address.clone());
                Ok(())
            })
            .inspect_err(|e| log::debug!("Address change for order {} refused: {}", id, e))?;

        log::info!("Updated shipping address of order {}", id);
        Ok(updated)
    }

    pub fn cancel_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        let mut previous = None;
        let updated = self
            .repo
            .update(id, &mut |order| {
                policy::ensure_modifiable(order)?;
                previous = Some(order.status());
                order.set_status(OrderStatus::Cancelled);
                Ok(())
            })
            .inspect_err(|e| log::debug!("Cancellation of order {} refused: {}", id, e))?;

        if let Some(from) = previous {
            log::info!("Order {} {} -> {}", id, from, updated.status());
        }
        Ok(updated)
    }

    /// Approves a return without touching the order's lifecycle state.
    pub fn request_return(
        &self,
        id: &OrderId,
        reason: ReturnReason,
    ) -> Result<ReturnApproval, OrderError> {
        let order = self.get_order_details(id)?;
        let now = self.clock.now();
        policy::ensure_returnable(&order, now)
            .inspect_err(|e| log::debug!("Return of order {} refused: {}", id, e))?;

        let approval = ReturnApproval {
            return_id: ReturnId::generate(),
            order_id: order.id().clone(),
            reason,
            approved_at: now,
            ship_by: now + Duration::days(policy::RETURN_SHIPPING_DAYS),
        };
        log::info!(
            "Approved return {} for order {} ({})",
            approval.return_id,
            id,
            reason.as_str()
        );
        Ok(approval)
    }

    /// Moves an order one step along its lifecycle, e.g. when fulfilment
    /// ships or delivers it.
    pub fn advance_status(&self, id: &OrderId, next: OrderStatus) -> Result<Order, OrderError> {
        let mut previous = None;
        let updated = self
            .repo
            .update(id, &mut |order| {
                policy::ensure_transition(order, next)?;
                previous = Some(order.status());
                order.set_status(next);
                Ok(())
            })
            .inspect_err(|e| log::debug!("Transition of order {} to {} refused: {}", id, next, e))?;

        if let Some(from) = previous {
            log::info!("Order {} {} -> {}", id, from, next);
        }
        Ok(updated)
    }
}
