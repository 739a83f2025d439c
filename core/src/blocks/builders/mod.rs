mod block_chain_builder;
pub use block_chain_builder::BlockChainBuilder;
