use super::{
    ConfHeightDetails, ConfirmedIteratedPair, PendingConfirmationHeight, ReceiveSourcePair,
};
use crate::{
    consensus::ActiveElections,
    stats::{DetailType, Direction, StatType, Stats},
};
use rsopal_core::{
    utils::{ContainerInfo, ContainerInfoComponent, Logger},
    Account, BlockHash,
};
use rsopal_ledger::{Ledger, WriteDatabaseQueue, Writer};
use rsopal_store::ReadTransaction;
use std::{
    collections::{HashMap, VecDeque},
    mem::size_of,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
};

/// Descents over more unconfirmed blocks than this are worth a log line.
const LARGE_CHAIN_LOG_THRESHOLD: u64 = 20_000;

/// Marker for a receive frame whose blocks-confirmed count has not been
/// fixed up yet. Never reaches the write path.
const HEIGHT_NOT_SET: u64 = u64::MAX;

#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationHeightProcessorConfig {
    /// Max queued entries before a flush and max account updates per write
    /// transaction
    pub batch_write_size: usize,
    /// Blocks visited per read transaction refresh while walking a chain
    pub batch_read_size: u64,
}

impl Default for ConfirmationHeightProcessorConfig {
    fn default() -> Self {
        Self {
            batch_write_size: 4096,
            batch_read_size: 14_000,
        }
    }
}

/// Raises per-account confirmation heights for everything implicitly
/// confirmed by a hash that consensus decided on.
///
/// Confirming a receive block also confirms the paired send and,
/// transitively, the sender's chain up to that send, so a single hash can
/// cement blocks across many accounts. The traversal follows those
/// receive/source links depth first and writes heights from the ground
/// upwards in batches, to keep the store's write lock short.
pub struct ConfirmationHeightProcessor {
    processor_loop: Arc<ProcessorLoop>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl ConfirmationHeightProcessor {
    pub fn new(
        config: ConfirmationHeightProcessorConfig,
        ledger: Arc<Ledger>,
        write_database_queue: Arc<WriteDatabaseQueue>,
        active: Arc<dyn ActiveElections>,
        logger: Arc<dyn Logger>,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            processor_loop: Arc::new(ProcessorLoop {
                config,
                ledger,
                write_database_queue,
                active,
                logger,
                stats,
                pending: PendingConfirmationHeight::new(),
                stopped: AtomicBool::new(false),
                receive_source_pairs_size: AtomicUsize::new(0),
            }),
            thread: Mutex::new(None),
        }
    }

    pub fn start(&self) {
        debug_assert!(self.thread.lock().unwrap().is_none());

        let processor_loop = Arc::clone(&self.processor_loop);
        *self.thread.lock().unwrap() = Some(
            std::thread::Builder::new()
                .name("Conf height".to_string())
                .spawn(move || processor_loop.run())
                .unwrap(),
        );
    }

    /// Idempotent; joins the worker thread.
    pub fn stop(&self) {
        {
            let _guard = self.processor_loop.pending.lock();
            self.processor_loop.stopped.store(true, Ordering::SeqCst);
        }
        self.processor_loop.pending.notify_all();
        let handle = self.thread.lock().unwrap().take();
        if let Some(handle) = handle {
            handle.join().unwrap();
        }
    }

    /// Enqueues a hash for processing. Duplicates coalesce.
    pub fn add(&self, hash: BlockHash) {
        if self.processor_loop.pending.add(hash) {
            self.processor_loop
                .stats
                .inc(StatType::ConfirmationHeight, DetailType::Insert);
        } else {
            self.processor_loop
                .stats
                .inc(StatType::ConfirmationHeight, DetailType::Duplicate);
        }
    }

    pub fn size(&self) -> usize {
        self.processor_loop.pending.size()
    }

    /// True while the hash is queued or being worked on.
    pub fn is_processing(&self, hash: &BlockHash) -> bool {
        self.processor_loop.pending.is_processing(hash)
    }

    pub fn current(&self) -> BlockHash {
        self.processor_loop.pending.current()
    }

    /// Stops the worker from picking up new hashes. Only used in tests.
    pub fn pause(&self) {
        self.processor_loop.pending.lock().paused = true;
    }

    pub fn unpause(&self) {
        self.processor_loop.pending.lock().paused = false;
        self.processor_loop.pending.notify_all();
    }

    pub fn receive_source_pairs_size(&self) -> usize {
        self.processor_loop
            .receive_source_pairs_size
            .load(Ordering::Relaxed)
    }

    pub fn collect_container_info(&self, name: impl Into<String>) -> ContainerInfoComponent {
        ContainerInfoComponent::Composite(
            name.into(),
            vec![
                ContainerInfoComponent::Leaf(ContainerInfo {
                    name: "pending".to_string(),
                    count: self.size(),
                    sizeof_element: size_of::<BlockHash>(),
                }),
                ContainerInfoComponent::Leaf(ContainerInfo {
                    name: "receive_source_pairs".to_string(),
                    count: self.receive_source_pairs_size(),
                    sizeof_element: size_of::<ReceiveSourcePair>(),
                }),
            ],
        )
    }
}

impl Drop for ConfirmationHeightProcessor {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ProcessorLoop {
    config: ConfirmationHeightProcessorConfig,
    ledger: Arc<Ledger>,
    write_database_queue: Arc<WriteDatabaseQueue>,
    active: Arc<dyn ActiveElections>,
    logger: Arc<dyn Logger>,
    stats: Arc<Stats>,
    pending: PendingConfirmationHeight,
    stopped: AtomicBool,
    /// Tracks the DFS stack size for diagnostics, so that no lock is needed
    /// on the traversal state itself.
    receive_source_pairs_size: AtomicUsize,
}

impl ProcessorLoop {
    fn run(&self) {
        let mut guard = self.pending.lock();
        while !self.stopped.load(Ordering::SeqCst) {
            if guard.paused {
                guard.current_hash = BlockHash::zero();
                guard = self.pending.wait(guard);
            } else if let Some(&hash) = guard.pending.iter().next() {
                guard.pending.remove(&hash);
                guard.current_hash = hash;
                drop(guard);
                self.process(hash);
                guard = self.pending.lock();
                guard.current_hash = BlockHash::zero();
            } else {
                guard = self.pending.wait(guard);
            }
        }
    }

    /// Confirms `hash`, everything below it in its account chain, and every
    /// chain reachable through receive blocks along the way.
    ///
    /// Writes are collected into `pending_writes` and flushed bottom-up so
    /// that a crash can never leave a receive confirmed while its source is
    /// not.
    fn process(&self, hash: BlockHash) {
        let mut receive_details: Option<ConfHeightDetails> = None;
        let mut current = hash;
        let mut pending_writes: VecDeque<ConfHeightDetails> = VecDeque::new();
        // Highest confirmed and iterated heights per account seen during
        // this call. iterated_height stops rescans of chain regions that
        // were already walked, which is what terminates self-send and
        // mutual-send cycles.
        let mut confirmed_iterated_pairs: HashMap<Account, ConfirmedIteratedPair> = HashMap::new();
        let mut receive_source_pairs: Vec<ReceiveSourcePair> = Vec::new();
        debug_assert_eq!(self.receive_source_pairs_size.load(Ordering::Relaxed), 0);

        let mut read_txn = self.ledger.read_txn();

        loop {
            if let Some(pair) = receive_source_pairs.last() {
                receive_details = Some(pair.receive_details.clone());
                current = pair.source_hash;
            } else if receive_details.is_some() {
                // If receive_details is set then this is the final iteration
                // and we are back on the original chain. Confirm any blocks
                // below the original hash (incl. itself) and the first
                // receive block, if the original block is not one already.
                current = hash;
                receive_details = None;
            }

            let Some(block) = self.ledger.get_block(read_txn.txn(), &current) else {
                self.ledger_mismatch(&current, &mut receive_source_pairs);
                break;
            };
            let block_height = block.height();
            let account = block.account();
            let Some(account_info) = self.ledger.account_info(read_txn.txn(), &account) else {
                self.ledger_mismatch(&current, &mut receive_source_pairs);
                break;
            };

            let mut confirmation_height = account_info.confirmation_height;
            let mut iterated_height = confirmation_height;
            if let Some(found) = confirmed_iterated_pairs.get(&account) {
                if found.confirmed_height > confirmation_height {
                    confirmation_height = found.confirmed_height;
                    iterated_height = confirmation_height;
                }
                if found.iterated_height > iterated_height {
                    iterated_height = found.iterated_height;
                }
            }

            let count_before_receive = receive_source_pairs.len();
            if block_height > iterated_height {
                if block_height - iterated_height > LARGE_CHAIN_LOG_THRESHOLD {
                    self.logger.always_log(&format!(
                        "Iterating over a large account chain for setting confirmation height. The top block: {}",
                        current
                    ));
                }

                self.collect_unconfirmed_receive_and_sources_for_account(
                    block_height,
                    iterated_height,
                    current,
                    account,
                    read_txn.as_mut(),
                    &mut receive_source_pairs,
                );
            }

            // A long descent can be interrupted by stop(); in that case the
            // scan is incomplete and nothing below it may be cemented.
            if self.stopped.load(Ordering::SeqCst) {
                self.clear_dfs(&mut receive_source_pairs);
                break;
            }

            // No longer need the read transaction
            read_txn.reset();

            // If the scan added no new receive frames then this account, and
            // the receive block that led into it, can now be confirmed.
            let confirmed_receives_pending = count_before_receive != receive_source_pairs.len();
            if !confirmed_receives_pending {
                if block_height > confirmation_height {
                    match confirmed_iterated_pairs.get_mut(&account) {
                        Some(pair) => {
                            pair.confirmed_height = block_height;
                            if block_height > iterated_height {
                                pair.iterated_height = block_height;
                            }
                        }
                        None => {
                            confirmed_iterated_pairs.insert(
                                account,
                                ConfirmedIteratedPair {
                                    confirmed_height: block_height,
                                    iterated_height: block_height,
                                },
                            );
                        }
                    }
                    pending_writes.push_back(ConfHeightDetails {
                        account,
                        hash: current,
                        height: block_height,
                        num_blocks_confirmed: block_height - confirmation_height,
                    });
                }

                if let Some(details) = &receive_details {
                    let mut details = details.clone();
                    let receive_account = details.account;
                    match confirmed_iterated_pairs.get_mut(&receive_account) {
                        Some(pair) => {
                            // Sends below the receive were counted by an
                            // earlier entry for this account; only the run up
                            // to the previously recorded height is new.
                            let current_height = pair.confirmed_height;
                            pair.confirmed_height = details.height;
                            details.num_blocks_confirmed = details.height - current_height;
                        }
                        None => {
                            confirmed_iterated_pairs.insert(
                                receive_account,
                                ConfirmedIteratedPair {
                                    confirmed_height: details.height,
                                    iterated_height: details.height,
                                },
                            );
                        }
                    }
                    pending_writes.push_back(details);
                }

                if receive_source_pairs.pop().is_some() {
                    self.receive_source_pairs_size
                        .store(receive_source_pairs.len(), Ordering::Relaxed);
                }
            } else if block_height > iterated_height {
                match confirmed_iterated_pairs.get_mut(&account) {
                    Some(pair) => pair.iterated_height = block_height,
                    None => {
                        confirmed_iterated_pairs.insert(
                            account,
                            ConfirmedIteratedPair {
                                confirmed_height: confirmation_height,
                                iterated_height: block_height,
                            },
                        );
                    }
                }
            }

            let total_pending_write_block_count: u64 = pending_writes
                .iter()
                .map(|details| details.num_blocks_confirmed)
                .sum();

            let max_batch_write_size_reached =
                pending_writes.len() >= self.config.batch_write_size;
            if (max_batch_write_size_reached || receive_source_pairs.is_empty())
                && !pending_writes.is_empty()
            {
                let error = self.write_pending(&mut pending_writes, total_pending_write_block_count);
                if error {
                    // Don't set any more blocks as confirmed from the
                    // original hash if an inconsistency was found
                    self.clear_dfs(&mut receive_source_pairs);
                    break;
                }
                debug_assert!(pending_writes.is_empty());
            }

            // Exit early when the processor has been stopped; updating a
            // long chain could otherwise keep the process alive.
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }

            read_txn.renew();

            if receive_source_pairs.is_empty() && current == hash {
                break;
            }
        }
    }

    /// Walks an account chain downwards through its unscanned region. Every
    /// receive block with a known, non-epoch source pushes a DFS frame for
    /// the source's chain.
    fn collect_unconfirmed_receive_and_sources_for_account(
        &self,
        block_height: u64,
        confirmation_height: u64,
        top_hash: BlockHash,
        account: Account,
        txn: &mut dyn ReadTransaction,
        receive_source_pairs: &mut Vec<ReceiveSourcePair>,
    ) {
        let mut hash = top_hash;
        let mut num_to_confirm = block_height - confirmation_height;
        let count_before = receive_source_pairs.len();

        // Height of the receive pushed most recently on this descent
        let mut next_height = HEIGHT_NOT_SET;
        while num_to_confirm > 0 && !hash.is_zero() {
            if let Some(block) = self.ledger.get_block(txn.txn(), &hash) {
                if !self.pending.is_processing(&hash) {
                    self.active.confirm_block(txn.txn(), &block);
                }

                let source = block.source_or_link();
                if !source.is_zero()
                    && !self.ledger.is_epoch_link(&source.into())
                    && self.ledger.source_exists(txn.txn(), &source)
                {
                    let receive_height = confirmation_height + num_to_confirm;
                    // The run of blocks between two adjacent unconfirmed
                    // receives belongs to the higher one.
                    if next_height != HEIGHT_NOT_SET {
                        receive_source_pairs
                            .last_mut()
                            .unwrap()
                            .receive_details
                            .num_blocks_confirmed = next_height - receive_height;
                    }

                    receive_source_pairs.push(ReceiveSourcePair {
                        receive_details: ConfHeightDetails {
                            account,
                            hash,
                            height: receive_height,
                            num_blocks_confirmed: HEIGHT_NOT_SET,
                        },
                        source_hash: source,
                    });
                    self.receive_source_pairs_size
                        .store(receive_source_pairs.len(), Ordering::Relaxed);
                    next_height = receive_height;
                }

                hash = block.previous();
            }

            // Don't hold a read transaction open over a very long walk
            if num_to_confirm % self.config.batch_read_size == 0 {
                if self.stopped.load(Ordering::SeqCst) {
                    return;
                }
                txn.refresh();
            }
            num_to_confirm -= 1;
        }

        // The lowest receive on this descent confirms everything between
        // itself and the already-iterated region.
        if receive_source_pairs.len() > count_before {
            let last = receive_source_pairs.last_mut().unwrap();
            last.receive_details.num_blocks_confirmed =
                last.receive_details.height - confirmation_height;
        }
    }

    /// Applies queued writes front to back, at most `batch_write_size`
    /// account updates per write transaction. Returns true when a block to
    /// be written no longer exists.
    fn write_pending(
        &self,
        all_pending: &mut VecDeque<ConfHeightDetails>,
        total_pending_write_block_count: u64,
    ) -> bool {
        let mut total = total_pending_write_block_count;
        while !all_pending.is_empty() {
            let mut num_accounts_processed = 0usize;
            let _write_guard = self.write_database_queue.wait(Writer::ConfirmationHeight);
            let mut txn = self.ledger.rw_txn();
            while let Some(pending) = all_pending.pop_front() {
                debug_assert_ne!(pending.num_blocks_confirmed, HEIGHT_NOT_SET);
                let Some(mut account_info) =
                    self.ledger.account_info(txn.txn(), &pending.account)
                else {
                    self.write_failed(&pending.hash);
                    return true;
                };
                if pending.height > account_info.confirmation_height {
                    // The block could have been rolled back by another part
                    // of the node in the meantime.
                    let Some(block) = self.ledger.get_block(txn.txn(), &pending.hash) else {
                        self.write_failed(&pending.hash);
                        return true;
                    };
                    debug_assert_eq!(block.height(), pending.height);
                    debug_assert_eq!(
                        pending.num_blocks_confirmed,
                        pending.height - account_info.confirmation_height
                    );

                    self.stats.add(
                        StatType::ConfirmationHeight,
                        DetailType::BlocksConfirmed,
                        Direction::In,
                        pending.height - account_info.confirmation_height,
                    );
                    self.ledger.cache.cemented_count.fetch_add(
                        pending.height - account_info.confirmation_height,
                        Ordering::SeqCst,
                    );
                    account_info.confirmation_height = pending.height;
                    self.ledger
                        .store
                        .account
                        .put(txn.as_mut(), &pending.account, &account_info);
                }
                total = total.saturating_sub(pending.num_blocks_confirmed);
                num_accounts_processed += 1;

                if num_accounts_processed >= self.config.batch_write_size {
                    // Commit periodically to keep the write lock short when
                    // confirming long chains
                    break;
                }
            }
            txn.commit();
        }
        debug_assert_eq!(total, 0);
        false
    }

    fn write_failed(&self, hash: &BlockHash) {
        self.logger
            .always_log(&format!("Failed to write confirmation height for: {}", hash));
        self.stats
            .inc(StatType::ConfirmationHeight, DetailType::InvalidBlock);
    }

    fn ledger_mismatch(
        &self,
        hash: &BlockHash,
        receive_source_pairs: &mut Vec<ReceiveSourcePair>,
    ) {
        self.logger.always_log(&format!(
            "Ledger mismatch trying to set confirmation height for block {}",
            hash
        ));
        self.stats
            .inc(StatType::ConfirmationHeight, DetailType::InvalidBlock);
        self.clear_dfs(receive_source_pairs);
    }

    fn clear_dfs(&self, receive_source_pairs: &mut Vec<ReceiveSourcePair>) {
        receive_source_pairs.clear();
        self.receive_source_pairs_size.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsopal_core::{epoch_v1_link, BlockChainBuilder, BlockEnum};
    use rsopal_store::{Transaction, TransactionTracker};

    struct RecordingElections {
        confirmed: Mutex<Vec<BlockHash>>,
    }

    impl RecordingElections {
        fn new() -> Self {
            Self {
                confirmed: Mutex::new(Vec::new()),
            }
        }

        fn confirmed(&self) -> Vec<BlockHash> {
            self.confirmed.lock().unwrap().clone()
        }
    }

    impl ActiveElections for RecordingElections {
        fn confirm_block(&self, _txn: &dyn Transaction, block: &BlockEnum) {
            self.confirmed.lock().unwrap().push(block.hash());
        }
    }

    struct TestLogger {
        entries: Mutex<Vec<String>>,
    }

    impl TestLogger {
        fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
            }
        }

        fn count_containing(&self, needle: &str) -> usize {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.contains(needle))
                .count()
        }
    }

    impl Logger for TestLogger {
        fn try_log(&self, message: &str) -> bool {
            self.always_log(message);
            true
        }

        fn always_log(&self, message: &str) {
            self.entries.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct CountingTracker {
        read_starts: AtomicUsize,
        write_starts: AtomicUsize,
    }

    impl TransactionTracker for CountingTracker {
        fn txn_start(&self, _txn_id: u64, is_write: bool) {
            if is_write {
                self.write_starts.fetch_add(1, Ordering::Relaxed);
            } else {
                self.read_starts.fetch_add(1, Ordering::Relaxed);
            }
        }

        fn txn_end(&self, _txn_id: u64, _is_write: bool) {}
    }

    struct Fixture {
        processor: ConfirmationHeightProcessor,
        ledger: Arc<Ledger>,
        elections: Arc<RecordingElections>,
        logger: Arc<TestLogger>,
        stats: Arc<Stats>,
    }

    impl Fixture {
        fn new(ledger: Arc<Ledger>) -> Self {
            Self::with_config(ledger, Default::default())
        }

        fn with_config(ledger: Arc<Ledger>, config: ConfirmationHeightProcessorConfig) -> Self {
            let elections = Arc::new(RecordingElections::new());
            let logger = Arc::new(TestLogger::new());
            let stats = Arc::new(Stats::new());
            let processor = ConfirmationHeightProcessor::new(
                config,
                Arc::clone(&ledger),
                Arc::new(WriteDatabaseQueue::new()),
                Arc::clone(&elections) as Arc<dyn ActiveElections>,
                Arc::clone(&logger) as Arc<dyn Logger>,
                Arc::clone(&stats),
            );
            Self {
                processor,
                ledger,
                elections,
                logger,
                stats,
            }
        }

        /// Runs one traversal on the calling thread, with the queue state
        /// set the way the worker loop sets it.
        fn process(&self, hash: BlockHash) {
            self.processor.processor_loop.pending.lock().current_hash = hash;
            self.processor.processor_loop.process(hash);
            self.processor.processor_loop.pending.lock().current_hash = BlockHash::zero();
        }

        fn confirmation_height(&self, account: &Account) -> u64 {
            let txn = self.ledger.read_txn();
            self.ledger.confirmation_height(txn.txn(), account)
        }

        fn blocks_confirmed(&self) -> u64 {
            self.stats.count(
                StatType::ConfirmationHeight,
                DetailType::BlocksConfirmed,
                Direction::In,
            )
        }

        fn invalid_blocks(&self) -> u64 {
            self.stats.count(
                StatType::ConfirmationHeight,
                DetailType::InvalidBlock,
                Direction::In,
            )
        }
    }

    #[test]
    fn cement_single_chain() {
        let mut chain = BlockChainBuilder::for_account(1).legacy_open();
        for _ in 0..99 {
            chain = chain.legacy_send();
        }
        let ledger = Arc::new(Ledger::null_builder().chain(&chain, 1).finish());
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain.frontier());

        assert_eq!(fixture.confirmation_height(&chain.account()), 100);
        assert_eq!(fixture.blocks_confirmed(), 99);
        assert_eq!(ledger.cemented_count(), 100);

        // Every newly confirmed block is announced except the hash being
        // processed itself
        let confirmed = fixture.elections.confirmed();
        assert_eq!(confirmed.len(), 98);
        assert!(!confirmed.contains(&chain.frontier()));
    }

    #[test]
    fn cement_send_receive_between_accounts() {
        let chain_a = BlockChainBuilder::for_account(1)
            .legacy_open()
            .legacy_send()
            .legacy_send_to(Account::from(2));
        let send = chain_a.latest_block().clone();
        let chain_b = BlockChainBuilder::for_account(2)
            .legacy_open()
            .legacy_receive_from(&send);

        let ledger = Arc::new(
            Ledger::null_builder()
                .chain(&chain_a, 1)
                .chain(&chain_b, 1)
                .finish(),
        );
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain_b.frontier());

        // The sender's chain is cemented up to the send before the receive
        assert_eq!(fixture.confirmation_height(&chain_a.account()), 3);
        assert_eq!(fixture.confirmation_height(&chain_b.account()), 2);
        assert_eq!(fixture.blocks_confirmed(), 3);
        assert_eq!(
            fixture.elections.confirmed(),
            vec![
                chain_a.block_at_height(3).hash(),
                chain_a.block_at_height(2).hash()
            ]
        );
    }

    #[test]
    fn cement_self_send_loop() {
        let account = Account::from(1);
        let mut chain = BlockChainBuilder::for_account(1)
            .legacy_open()
            .legacy_send_to(account);
        let send = chain.latest_block().clone();
        chain = chain.legacy_receive_from(&send);

        let ledger = Arc::new(Ledger::null_builder().chain(&chain, 1).finish());
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain.frontier());

        assert_eq!(fixture.confirmation_height(&account), 3);
        assert_eq!(fixture.blocks_confirmed(), 2);
        // The send at height 2 is scanned exactly once
        assert_eq!(
            fixture.elections.confirmed(),
            vec![chain.block_at_height(2).hash()]
        );
    }

    #[test]
    fn cement_mutual_sends() {
        let account_a = Account::from(1);
        let account_b = Account::from(2);

        let mut chain_a = BlockChainBuilder::for_account(1)
            .legacy_open()
            .legacy_send_to(account_b);
        let send_a = chain_a.latest_block().clone();
        let chain_b = BlockChainBuilder::for_account(2)
            .legacy_open()
            .legacy_receive_from(&send_a)
            .legacy_send_to(account_a);
        let send_b = chain_b.latest_block().clone();
        chain_a = chain_a.legacy_receive_from(&send_b);

        let ledger = Arc::new(
            Ledger::null_builder()
                .chain(&chain_a, 1)
                .chain(&chain_b, 1)
                .finish(),
        );
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain_a.frontier());

        assert_eq!(fixture.confirmation_height(&account_a), 3);
        assert_eq!(fixture.confirmation_height(&account_b), 3);
        assert_eq!(fixture.blocks_confirmed(), 4);
        assert_eq!(
            fixture.elections.confirmed(),
            vec![
                chain_a.block_at_height(2).hash(),
                chain_b.block_at_height(3).hash(),
                chain_b.block_at_height(2).hash()
            ]
        );
    }

    #[test]
    fn cement_state_receive_follows_link() {
        let account_b = Account::from(2);
        let chain_a = BlockChainBuilder::for_account(1)
            .legacy_open()
            .state_send_to(account_b);
        let send = chain_a.latest_block().clone();
        let chain_b = BlockChainBuilder::for_account(2).state_receive_from(&send);

        let ledger = Arc::new(
            Ledger::null_builder()
                .chain(&chain_a, 1)
                .chain(&chain_b, 0)
                .finish(),
        );
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain_b.frontier());

        assert_eq!(fixture.confirmation_height(&chain_a.account()), 2);
        assert_eq!(fixture.confirmation_height(&account_b), 1);
        assert_eq!(fixture.blocks_confirmed(), 2);
    }

    #[test]
    fn epoch_link_is_not_a_source() {
        let chain = BlockChainBuilder::for_account(1)
            .legacy_open()
            .state_epoch(epoch_v1_link());
        let ledger = Arc::new(Ledger::null_builder().chain(&chain, 1).finish());
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain.frontier());

        assert_eq!(fixture.confirmation_height(&chain.account()), 2);
        assert_eq!(fixture.blocks_confirmed(), 1);
        assert_eq!(fixture.processor.receive_source_pairs_size(), 0);
    }

    #[test]
    fn large_chain_logs_and_refreshes_the_read_transaction() {
        let mut chain = BlockChainBuilder::for_account(1).legacy_open();
        for _ in 0..24_999 {
            chain = chain.legacy_send();
        }
        let tracker = Arc::new(CountingTracker::default());
        let ledger = Arc::new(
            Ledger::null_builder()
                .chain(&chain, 1)
                .txn_tracker(Arc::clone(&tracker) as Arc<dyn TransactionTracker>)
                .finish(),
        );
        let write_starts_after_seeding = tracker.write_starts.load(Ordering::Relaxed);
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain.frontier());
        let read_starts = tracker.read_starts.load(Ordering::Relaxed);

        assert_eq!(fixture.confirmation_height(&chain.account()), 25_000);
        assert_eq!(fixture.blocks_confirmed(), 24_999);
        assert_eq!(fixture.logger.count_containing("large account chain"), 1);
        // One read transaction refresh happened while walking the chain, on
        // top of the create and the renew after the write
        assert_eq!(read_starts, 3);
        // A single account entry fits in one write batch
        assert_eq!(
            tracker.write_starts.load(Ordering::Relaxed),
            write_starts_after_seeding + 1
        );
    }

    #[test]
    fn reprocessing_a_cemented_hash_writes_nothing() {
        let chain = BlockChainBuilder::for_account(1)
            .legacy_open()
            .legacy_send()
            .legacy_send();
        let ledger = Arc::new(Ledger::null_builder().chain(&chain, 1).finish());
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(chain.frontier());
        let confirmed = fixture.blocks_confirmed();
        let cemented = ledger.cemented_count();
        let announced = fixture.elections.confirmed().len();

        fixture.process(chain.frontier());

        assert_eq!(fixture.blocks_confirmed(), confirmed);
        assert_eq!(ledger.cemented_count(), cemented);
        assert_eq!(fixture.elections.confirmed().len(), announced);
    }

    #[test]
    fn missing_block_at_write_time_aborts() {
        let chain = BlockChainBuilder::for_account(1).legacy_open();
        let ledger = Arc::new(Ledger::null_builder().chain(&chain, 0).finish());
        let fixture = Fixture::new(Arc::clone(&ledger));

        let mut writes = VecDeque::from([ConfHeightDetails {
            account: chain.account(),
            hash: BlockHash::from(999),
            height: 1,
            num_blocks_confirmed: 1,
        }]);
        let error = fixture
            .processor
            .processor_loop
            .write_pending(&mut writes, 1);

        assert!(error);
        assert_eq!(fixture.invalid_blocks(), 1);
        assert_eq!(
            fixture
                .logger
                .count_containing("Failed to write confirmation height for"),
            1
        );
        assert_eq!(fixture.confirmation_height(&chain.account()), 0);
    }

    #[test]
    fn unknown_hash_aborts_the_invocation() {
        let ledger = Arc::new(Ledger::new_null());
        let fixture = Fixture::new(Arc::clone(&ledger));

        fixture.process(BlockHash::from(1));

        assert_eq!(fixture.invalid_blocks(), 1);
        assert_eq!(fixture.logger.count_containing("Ledger mismatch"), 1);
        assert_eq!(fixture.blocks_confirmed(), 0);
    }

    #[test]
    fn container_info() {
        let ledger = Arc::new(Ledger::new_null());
        let fixture = Fixture::new(ledger);
        let ContainerInfoComponent::Composite(name, children) = fixture
            .processor
            .collect_container_info("confirmation_height")
        else {
            panic!("expected composite");
        };
        assert_eq!(name, "confirmation_height");
        assert_eq!(children.len(), 2);
    }
}
