/// Size of one in-memory container, reported through the node's
/// diagnostics RPC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    pub count: usize,
    pub sizeof_element: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerInfoComponent {
    Leaf(ContainerInfo),
    Composite(String, Vec<ContainerInfoComponent>),
}
