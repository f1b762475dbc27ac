/// Something that reacts to events delivered through an [`super::EventObserver`].
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
