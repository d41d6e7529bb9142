#[derive(Debug, Clone)]
pub enum CollectionAction {
    /// Marks a payment as checked by an administrator.
    Verify,
}

#[derive(Debug, Clone)]
pub enum InvoiceAction {
    Void,
}
