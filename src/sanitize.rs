//! Load-time sanitizers: functions that pull a field back into its allowed
//! range. A [`Sanitizer`] binds such a function to its constant arguments;
//! the keeper then binds it to the field and runs it after every successful
//! load and before every save.

use crate::field::Field;

pub struct Sanitizer<T> {
    apply: Box<dyn Fn(&mut T)>,
}

impl<T: 'static> Sanitizer<T> {
    /// Binds `func` to `args`, e.g. `Sanitizer::new(clamp, (0, 10))`.
    pub fn new<A: 'static>(func: fn(&mut T, &A), args: A) -> Self {
        Sanitizer { apply: Box::new(move |value| func(value, &args)) }
    }
    pub fn from_fn(func: impl Fn(&mut T) + 'static) -> Self {
        Sanitizer { apply: Box::new(func) }
    }
    /// Runs the sanitizer on a value directly.
    pub fn apply(&self, value: &mut T) {
        (self.apply)(value)
    }
    pub(crate) fn bind(self, field: Field<T>) -> Box<dyn Fn()> {
        Box::new(move || (self.apply)(&mut *field.borrow_mut()))
    }
}

// ------------- Stock sanitizers -------------

/// Keeps `value` within `min..=max`.
pub fn clamp<T: PartialOrd + Clone>(value: &mut T, bounds: &(T, T)) {
    let (min, max) = bounds;
    if *value > *max {
        *value = max.clone();
    } else if *value < *min {
        *value = min.clone();
    }
}

/// Keeps every element within `min..=max`.
pub fn clamp_all<T, C>(values: &mut C, bounds: &(T, T))
where
    T: PartialOrd + Clone,
    C: AsMut<[T]> + ?Sized,
{
    for value in values.as_mut() {
        clamp(value, bounds);
    }
}

/// Cuts a string down to at most `limit` characters.
pub fn truncate_chars(value: &mut String, limit: &usize) {
    if let Some((cut, _)) = value.char_indices().nth(*limit) {
        value.truncate(cut);
    }
}
