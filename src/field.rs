// used to share a field between its owner and the keeper
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A field shared between the object that owns it and the keeper that
/// persists it. Cloning gives another handle to the same value.
///
/// No borrow may be held across a keeper call, since the keeper writes into
/// the field while it loads.
pub struct Field<T>(Rc<RefCell<T>>);

impl<T> Field<T> {
    pub fn new(value: T) -> Self {
        Field(Rc::new(RefCell::new(value)))
    }
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
    /// Modifies the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.0.borrow_mut());
    }
}

impl<T: Clone> Field<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Field<T> {
    fn default() -> Self {
        Field::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&*self.0.borrow()).finish()
    }
}
