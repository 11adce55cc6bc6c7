use arcstr::ArcStr;

use crate::graph::Graph;
use crate::Result;

/// A component that builds its own nodes, specs, and sub-instances in a [`Graph`].
pub trait Component: Sized {
    type Params;

    fn new(params: &Self::Params, graph: &mut Graph) -> Result<Self>;

    fn name(&self) -> ArcStr;
}

impl Graph {
    /// Builds a `C` whose nodes and specs are named under `name`.
    pub fn instantiate<C: Component>(
        &mut self,
        name: impl Into<ArcStr>,
        params: &C::Params,
    ) -> Result<C> {
        let name = name.into();
        log::debug!("instantiating {name}");
        self.push_scope(name);
        let inst = C::new(params, self);
        self.pop_scope();
        inst
    }
}
