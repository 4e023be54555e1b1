use crate::{Envelope, HandlerKind, HandlerName, Message, MessageType, Result};

use super::DispatchContext;

/// Type-erased wrapper around a registered handler and its instances.
pub(crate) trait Controller<M: Message> {
    fn name(&self) -> &HandlerName;

    fn kind(&self) -> HandlerKind;

    /// Message types routed to this controller, in declaration order.
    fn routes(&self) -> &[MessageType];

    /// Handle one envelope, returning the children it produced in order.
    fn handle(
        &mut self,
        envelope: &Envelope<M>,
        cx: &mut DispatchContext<'_, M>,
    ) -> Result<Vec<Envelope<M>>>;

    /// Forget every instance.
    fn reset(&mut self);

    fn instance_count(&self) -> usize;
}
