// In-memory chain gateway. One instance simulates one chain: an escrow
// table, per-address bank balances and a block height counter, with
// switches to force rejected transactions in tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::gateway::interface::{
    ChainGateway, EscrowParams, EscrowRecord, EscrowStatus, GatewayError, SwapId, TxResult,
};
use crate::swap_id::{secret_hash, swap_id, Secret};

#[derive(Default)]
struct MockChainState {
    escrows: HashMap<SwapId, EscrowRecord>,
    balances: HashMap<String, HashMap<String, u64>>,
    txs: HashMap<String, TxResult>,
    height: u64,
    fail_next_create: bool,
    fail_next_claim: bool,
    create_calls: u32,
    claim_calls: u32,
    query_calls: u32,
    transfer_seq: u32,
}

#[derive(Clone)]
pub struct MockChainGateway {
    chain_name: String,
    local_address: String,
    state: Arc<Mutex<MockChainState>>,
}

impl MockChainGateway {
    pub fn new(chain_name: &str, local_address: &str) -> Self {
        MockChainGateway {
            chain_name: chain_name.to_string(),
            local_address: local_address.to_string(),
            state: Arc::new(Mutex::new(MockChainState {
                height: 1,
                ..MockChainState::default()
            })),
        }
    }

    pub fn set_balance(&self, address: &str, denom: &str, amount: u64) {
        let mut state = self.state.lock().unwrap();
        state
            .balances
            .entry(address.to_string())
            .or_default()
            .insert(denom.to_string(), amount);
    }

    pub fn balance(&self, address: &str, denom: &str) -> u64 {
        let state = self.state.lock().unwrap();
        state
            .balances
            .get(address)
            .and_then(|denoms| denoms.get(denom))
            .copied()
            .unwrap_or(0)
    }

    // Inserts an escrow directly, bypassing balances. This is how tests and
    // the harness deputy place a mirrored escrow on the destination chain.
    pub fn open_escrow(&self, record: EscrowRecord) {
        let mut state = self.state.lock().unwrap();
        state.escrows.insert(record.id, record);
    }

    pub fn escrow(&self, id: SwapId) -> Option<EscrowRecord> {
        let state = self.state.lock().unwrap();
        state.escrows.get(&id).cloned()
    }

    pub fn open_escrows(&self) -> Vec<EscrowRecord> {
        let state = self.state.lock().unwrap();
        state
            .escrows
            .values()
            .filter(|rec| rec.status == EscrowStatus::Open)
            .cloned()
            .collect()
    }

    pub fn height(&self) -> u64 {
        self.state.lock().unwrap().height
    }

    pub fn set_height(&self, height: u64) {
        self.state.lock().unwrap().height = height;
    }

    pub fn set_fail_next_create(&self) {
        self.state.lock().unwrap().fail_next_create = true;
    }

    pub fn set_fail_next_claim(&self) {
        self.state.lock().unwrap().fail_next_claim = true;
    }

    pub fn create_calls(&self) -> u32 {
        self.state.lock().unwrap().create_calls
    }

    pub fn claim_calls(&self) -> u32 {
        self.state.lock().unwrap().claim_calls
    }

    pub fn query_calls(&self) -> u32 {
        self.state.lock().unwrap().query_calls
    }
}

// Rejections are recorded like any other tx so confirm_tx can replay them.
fn record_tx(state: &mut MockChainState, result: TxResult) -> TxResult {
    state.txs.insert(result.hash.clone(), result.clone());
    result
}

fn rejected(state: &mut MockChainState, hash: String, raw_log: &str) -> TxResult {
    record_tx(
        state,
        TxResult {
            success: false,
            hash,
            raw_log: raw_log.to_string(),
        },
    )
}

fn debit(state: &mut MockChainState, address: &str, denom: &str, amount: u64) -> bool {
    match state
        .balances
        .get_mut(address)
        .and_then(|denoms| denoms.get_mut(denom))
    {
        Some(balance) if *balance >= amount => {
            *balance -= amount;
            true
        }
        _ => false,
    }
}

fn credit(state: &mut MockChainState, address: &str, denom: &str, amount: u64) {
    *state
        .balances
        .entry(address.to_string())
        .or_default()
        .entry(denom.to_string())
        .or_insert(0) += amount;
}

fn expire_if_due(record: &mut EscrowRecord, height: u64) {
    if record.status == EscrowStatus::Open && height >= record.expiry_height {
        record.status = EscrowStatus::Expired;
    }
}

#[async_trait]
impl ChainGateway for MockChainGateway {
    fn chain_name(&self) -> &str {
        &self.chain_name
    }

    fn local_address(&self) -> &str {
        &self.local_address
    }

    async fn create_escrow(&self, params: EscrowParams) -> Result<TxResult, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;

        let id = swap_id(
            &params.secret_hash,
            &self.local_address,
            &params.sender_other_chain,
        );
        let hash = format!("create-{}", &hex::encode(id)[..16]);

        if state.fail_next_create {
            state.fail_next_create = false;
            return Ok(rejected(&mut state, hash, "broadcast rejected: sequence mismatch"));
        }
        if state.escrows.contains_key(&id) {
            return Ok(rejected(&mut state, hash, "swap already exists"));
        }
        if !debit(&mut state, &self.local_address, &params.denom, params.amount) {
            return Ok(rejected(&mut state, hash, "insufficient account funds"));
        }

        let expiry_height = state.height + params.height_span;
        let record = EscrowRecord {
            id,
            sender: self.local_address.clone(),
            recipient: params.recipient,
            sender_other_chain: params.sender_other_chain,
            recipient_other_chain: params.recipient_other_chain,
            secret_hash: params.secret_hash,
            timestamp: params.timestamp,
            amount: params.amount,
            denom: params.denom,
            expiry_height,
            status: EscrowStatus::Open,
        };
        state.escrows.insert(id, record);

        Ok(record_tx(
            &mut state,
            TxResult {
                success: true,
                hash,
                raw_log: String::new(),
            },
        ))
    }

    async fn claim_escrow(&self, id: SwapId, secret: &Secret) -> Result<TxResult, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.claim_calls += 1;

        let hash = format!("claim-{}", &hex::encode(id)[..16]);

        if state.fail_next_claim {
            state.fail_next_claim = false;
            return Ok(rejected(&mut state, hash, "broadcast rejected: sequence mismatch"));
        }

        let height = state.height;
        let Some(record) = state.escrows.get_mut(&id) else {
            return Ok(rejected(&mut state, hash, "swap not found"));
        };
        expire_if_due(record, height);
        match record.status {
            EscrowStatus::Open => {}
            EscrowStatus::Claimed => return Ok(rejected(&mut state, hash, "swap already claimed")),
            EscrowStatus::Expired => return Ok(rejected(&mut state, hash, "swap expired")),
        }
        if secret_hash(secret, record.timestamp) != record.secret_hash {
            return Ok(rejected(&mut state, hash, "invalid random number"));
        }

        record.status = EscrowStatus::Claimed;
        let (recipient, denom, amount) =
            (record.recipient.clone(), record.denom.clone(), record.amount);
        credit(&mut state, &recipient, &denom, amount);

        Ok(record_tx(
            &mut state,
            TxResult {
                success: true,
                hash,
                raw_log: String::new(),
            },
        ))
    }

    async fn query_escrow(&self, id: SwapId) -> Result<Option<EscrowRecord>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.query_calls += 1;
        let height = state.height;
        Ok(state.escrows.get_mut(&id).map(|record| {
            expire_if_due(record, height);
            record.clone()
        }))
    }

    async fn confirm_tx(&self, hash: &str, _timeout: Duration) -> Result<TxResult, GatewayError> {
        let state = self.state.lock().unwrap();
        Ok(state.txs.get(hash).cloned().unwrap_or(TxResult {
            success: false,
            hash: hash.to_string(),
            raw_log: "tx not found".to_string(),
        }))
    }

    async fn transfer(&self, to: &str, amount: u64, denom: &str) -> Result<TxResult, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.transfer_seq += 1;
        let hash = format!("transfer-{}", state.transfer_seq);

        if !debit(&mut state, &self.local_address, denom, amount) {
            return Ok(rejected(&mut state, hash, "insufficient account funds"));
        }
        credit(&mut state, to, denom, amount);

        Ok(record_tx(
            &mut state,
            TxResult {
                success: true,
                hash,
                raw_log: String::new(),
            },
        ))
    }
}

/// Builds the escrow the deputy would create on the destination chain for a
/// witnessed origin-chain escrow: same secret hash and timestamp, the
/// sender/counterparty pair seen from the other side, and the id re-derived
/// under that inverted order.
pub fn mirror_escrow(
    origin: &EscrowRecord,
    denom: &str,
    amount: u64,
    expiry_height: u64,
) -> EscrowRecord {
    EscrowRecord {
        id: swap_id(&origin.secret_hash, &origin.sender_other_chain, &origin.sender),
        sender: origin.sender_other_chain.clone(),
        recipient: origin.recipient_other_chain.clone(),
        sender_other_chain: origin.sender.clone(),
        recipient_other_chain: origin.recipient.clone(),
        secret_hash: origin.secret_hash,
        timestamp: origin.timestamp,
        amount,
        denom: denom.to_string(),
        expiry_height,
        status: EscrowStatus::Open,
    }
}

/// Stands in for the deputy process between two mock chains: every open
/// escrow witnessed on `origin` is mirrored onto `dest` exactly once, with
/// the amount passed through `convert`. Runs until the task is dropped.
pub async fn run_deputy_mirror<F>(
    origin: Arc<MockChainGateway>,
    dest: Arc<MockChainGateway>,
    dest_denom: String,
    convert: F,
    poll_interval: Duration,
    dest_height_span: u64,
) where
    F: Fn(u64) -> u64 + Send,
{
    loop {
        for record in origin.open_escrows() {
            let mirrored = mirror_escrow(
                &record,
                &dest_denom,
                convert(record.amount),
                dest.height() + dest_height_span,
            );
            if dest.escrow(mirrored.id).is_none() {
                dest.open_escrow(mirrored);
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}
