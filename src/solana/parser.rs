use crate::error::AppError;
use crate::solana::models::{InstructionRef, ParsedTransaction, TokenBalanceEntry};
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiInstruction, UiMessage,
    UiParsedInstruction, UiTransactionTokenBalance,
};
use tracing::debug;

/// Parse a Solana transaction from the RPC response into our domain model.
///
/// Transactions without status metadata are rejected; the aggregator skips
/// them rather than classifying a record with no balance information.
pub fn parse_transaction(
    encoded_tx: &EncodedConfirmedTransactionWithStatusMeta,
) -> Result<ParsedTransaction, AppError> {
    let meta = encoded_tx
        .transaction
        .meta
        .as_ref()
        .ok_or_else(|| AppError::ParseError("Transaction missing metadata".to_string()))?;

    let ui_tx = match &encoded_tx.transaction.transaction {
        EncodedTransaction::Json(ui_tx) => ui_tx,
        _ => {
            return Err(AppError::ParseError(
                "Unsupported transaction encoding".to_string(),
            ));
        }
    };

    let signature = ui_tx
        .signatures
        .first()
        .ok_or_else(|| AppError::ParseError("Transaction has no signature".to_string()))?
        .clone();

    let instructions = top_level_instructions(&ui_tx.message);

    // OptionSerializer converts into Option, keeping "omitted" distinct from "empty"
    let pre_token_balances: Option<Vec<UiTransactionTokenBalance>> =
        meta.pre_token_balances.clone().into();
    let post_token_balances: Option<Vec<UiTransactionTokenBalance>> =
        meta.post_token_balances.clone().into();

    debug!(
        signature = %signature,
        slot = encoded_tx.slot,
        instructions = instructions.len(),
        "Parsed transaction"
    );

    Ok(ParsedTransaction {
        signature,
        block_time: encoded_tx.block_time,
        instructions,
        pre_token_balances: pre_token_balances.map(|balances| convert_balances(&balances)),
        post_token_balances: post_token_balances.map(|balances| convert_balances(&balances)),
    })
}

/// Program ids of the top-level instructions.
///
/// Compiled instructions reference the program through the account key list;
/// an index outside that list drops the instruction.
fn top_level_instructions(message: &UiMessage) -> Vec<InstructionRef> {
    match message {
        UiMessage::Parsed(parsed) => parsed
            .instructions
            .iter()
            .filter_map(|instruction| match instruction {
                UiInstruction::Parsed(UiParsedInstruction::Parsed(ix)) => Some(ix.program_id.clone()),
                UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(ix)) => {
                    Some(ix.program_id.clone())
                }
                UiInstruction::Compiled(ix) => parsed
                    .account_keys
                    .get(ix.program_id_index as usize)
                    .map(|key| key.pubkey.clone()),
            })
            .map(|program_id| InstructionRef { program_id })
            .collect(),
        UiMessage::Raw(raw) => raw
            .instructions
            .iter()
            .filter_map(|ix| raw.account_keys.get(ix.program_id_index as usize).cloned())
            .map(|program_id| InstructionRef { program_id })
            .collect(),
    }
}

fn convert_balances(balances: &[UiTransactionTokenBalance]) -> Vec<TokenBalanceEntry> {
    balances
        .iter()
        .map(|balance| TokenBalanceEntry {
            account_index: balance.account_index,
            mint: balance.mint.clone(),
            ui_amount: balance.ui_token_amount.ui_amount,
        })
        .collect()
}
