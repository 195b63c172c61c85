use bevy::prelude::*;
use std::marker::PhantomData;

/// Present for exactly one tick on an entity that just gained a `T`.
#[derive(Component, Debug)]
#[component(storage = "SparseSet")]
pub struct ReactiveAdded<T: Component>(PhantomData<T>);

impl<T: Component> Default for ReactiveAdded<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

/// Present for exactly one tick on a live entity that just lost its `T`.
#[derive(Component, Debug)]
#[component(storage = "SparseSet")]
pub struct ReactiveRemoved<T: Component>(PhantomData<T>);

impl<T: Component> Default for ReactiveRemoved<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}
