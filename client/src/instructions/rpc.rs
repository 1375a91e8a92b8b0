use anyhow::{format_err, Result};
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig},
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    let config = RpcSendTransactionConfig {
        skip_preflight: false,
        ..RpcSendTransactionConfig::default()
    };
    if wait_confirm {
        Ok(client.send_and_confirm_transaction_with_spinner_and_config(
            txn,
            CommitmentConfig::confirmed(),
            config,
        )?)
    } else {
        Ok(client.send_transaction_with_config(txn, config)?)
    }
}

/// Log lines of a confirmed transaction.
pub fn get_transaction_logs(client: &RpcClient, signature: &Signature) -> Result<Vec<String>> {
    let txn = client.get_transaction_with_config(
        signature,
        RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        },
    )?;
    let meta = txn
        .transaction
        .meta
        .ok_or_else(|| format_err!("transaction {} has no status meta", signature))?;
    Option::<Vec<String>>::from(meta.log_messages)
        .ok_or_else(|| format_err!("transaction {} has no logs", signature))
}

pub fn get_account(client: &RpcClient, address: &Pubkey) -> Result<Account> {
    client
        .get_account(address)
        .map_err(|e| format_err!("failed to load account {}: {}", address, e))
}
