use anyhow::Context;
use serde_json::Value;
use shared::TokenHolding;
use solana_account_decoder::UiAccountData;

/// Decode one `jsonParsed` token account into a holding
///
/// The amount is `tokenAmount.uiAmount`, then `uiAmountString`, then 0 when the
/// node reports neither (uiAmount is null for some zero balances).
pub fn parse_token_holding(data: &UiAccountData) -> anyhow::Result<TokenHolding> {
    let parsed = match data {
        UiAccountData::Json(parsed_account) => &parsed_account.parsed,
        _ => anyhow::bail!("Expected JSON parsed account data"),
    };

    let info = parsed
        .get("info")
        .ok_or_else(|| anyhow::anyhow!("Missing info field"))?;

    let mint = info
        .get("mint")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing mint field"))?
        .to_string();

    let token_amount = info
        .get("tokenAmount")
        .ok_or_else(|| anyhow::anyhow!("Missing tokenAmount field"))?;

    let amount = match token_amount.get("uiAmount").and_then(Value::as_f64) {
        Some(amount) => amount,
        None => match token_amount.get("uiAmountString").and_then(Value::as_str) {
            Some(s) => s
                .parse::<f64>()
                .with_context(|| format!("Failed to parse uiAmountString: {}", s))?,
            None => 0.0,
        },
    };

    Ok(TokenHolding { mint, amount })
}
