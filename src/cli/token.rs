//! Token commands - issue and verify tokens from the command line

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::api::auth::TokenPairResponse;
use crate::domain::{SubjectId, TokenError, TokenType};
use crate::infrastructure::auth::JwtManager;

#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Subject (user) id, a positive integer
    #[arg(long)]
    pub subject: i64,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Token to validate
    #[arg(long)]
    pub token: String,

    /// Expected token type
    #[arg(long = "type", value_enum, default_value_t = TokenTypeArg::Access)]
    pub token_type: TokenTypeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenTypeArg {
    Access,
    Refresh,
}

impl From<TokenTypeArg> for TokenType {
    fn from(arg: TokenTypeArg) -> Self {
        match arg {
            TokenTypeArg::Access => TokenType::Access,
            TokenTypeArg::Refresh => TokenType::Refresh,
        }
    }
}

#[derive(Debug, Serialize)]
struct VerifyOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<SubjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

pub fn issue(args: IssueArgs) -> anyhow::Result<()> {
    let (_, manager) = super::load_manager()?;
    println!("{}", issue_json(&manager, args.subject)?);
    Ok(())
}

pub fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    let (_, manager) = super::load_manager()?;
    let result = manager.validate_token(&args.token, args.token_type.into());

    println!("{}", serde_json::to_string_pretty(&verify_output(&result))?);

    result.map(|_| ()).map_err(|e| anyhow::anyhow!("token rejected: {}", e))
}

fn issue_json(manager: &JwtManager, subject: i64) -> anyhow::Result<String> {
    let subject_id = SubjectId::new(subject)
        .ok_or_else(|| anyhow::anyhow!("subject id must be a positive integer, got {}", subject))?;

    let pair = manager.issue_token_pair(subject_id)?;
    Ok(serde_json::to_string_pretty(&TokenPairResponse::from(pair))?)
}

fn verify_output(result: &Result<SubjectId, TokenError>) -> VerifyOutput {
    match result {
        Ok(id) => VerifyOutput {
            valid: true,
            id: Some(*id),
            reason: None,
        },
        Err(e) => VerifyOutput {
            valid: false,
            id: None,
            reason: Some(e.code()),
        },
    }
}
