//! Bind / unbind pairing.
//!
//! Bind points are global mutable driver state; whatever gets bound must be unbound in reverse
//! order or the binding leaks into the next piece of code touching the context. [`block_bind`]
//! packages that discipline: it binds a set of objects in order and returns a guard that unbinds
//! them in reverse when dropped.

/// Objects that can be bound to — and unbound from — a single driver bind point.
pub trait Binder {
  /// Bind the object.
  fn bind(&self);

  /// Unbind the object.
  fn unbind(&self);
}

/// Guard returned by [`block_bind`]; unbinds in reverse order on drop.
pub struct BindGuard<'a> {
  objs: Vec<&'a dyn Binder>,
}

/// Bind the objects in order and return a guard that unbinds them in reverse order when it goes
/// out of scope.
pub fn block_bind<'a>(objs: Vec<&'a dyn Binder>) -> BindGuard<'a> {
  for obj in &objs {
    obj.bind();
  }

  BindGuard { objs }
}

impl<'a> Drop for BindGuard<'a> {
  fn drop(&mut self) {
    for obj in self.objs.iter().rev() {
      obj.unbind();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  struct Recorder<'a> {
    name: &'static str,
    log: &'a RefCell<Vec<String>>,
  }

  impl Binder for Recorder<'_> {
    fn bind(&self) {
      self.log.borrow_mut().push(format!("bind {}", self.name));
    }

    fn unbind(&self) {
      self.log.borrow_mut().push(format!("unbind {}", self.name));
    }
  }

  #[test]
  fn unbinds_in_reverse_order() {
    let log = RefCell::new(Vec::new());
    let a = Recorder { name: "a", log: &log };
    let b = Recorder { name: "b", log: &log };

    {
      let _guard = block_bind(vec![&a, &b]);
      assert_eq!(*log.borrow(), ["bind a", "bind b"]);
    }

    assert_eq!(*log.borrow(), ["bind a", "bind b", "unbind b", "unbind a"]);
  }
}
