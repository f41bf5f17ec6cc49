// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 bindings for USDC balances and burn approvals

use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use Erc20::Erc20Instance;

/// ERC20 read wrapper over a connected provider.
pub struct Erc20Contract<P: Provider<Ethereum>> {
    instance: Erc20Instance<P>,
}

impl<P: Provider<Ethereum>> Erc20Contract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self {
            instance: Erc20Instance::new(address, provider),
        }
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.balanceOf(account).call().await?;

        debug!(
            account = %account,
            balance = %result,
            contract_address = %self.instance.address(),
            event = "balance_retrieved"
        );

        Ok(result)
    }
}

/// Unsigned `approve(spender, amount)` on `token`, to be signed by the wallet.
pub fn approve_transaction(
    token: Address,
    from: Address,
    spender: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        spender = %spender,
        amount = %amount,
        contract_address = %token,
        event = "approve_transaction_created"
    );

    let calldata = Erc20::approveCall { spender, amount }.abi_encode();

    TransactionRequest::default()
        .from(from)
        .to(token)
        .input(TransactionInput::new(calldata.into()))
}

// Minimal ERC20 interface
sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    #[test]
    fn test_approve_transaction_calldata() {
        let token = address!("036CbD53842c5426634e7929541eC2318f3dCF7e");
        let owner = address!("1111111111111111111111111111111111111111");
        let spender = address!("8FE6B999Dc680CcFDD5Bf7EB0974218be2542DAA");

        let tx = approve_transaction(token, owner, spender, U256::from(1_000_000u64));

        assert_eq!(tx.from, Some(owner));
        assert_eq!(tx.to, Some(token.into()));

        let input = tx.input.input().unwrap();
        // approve(address,uint256)
        assert_eq!(hex::encode(&input[..4]), "095ea7b3");

        let decoded = Erc20::approveCall::abi_decode(input).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, U256::from(1_000_000u64));
    }
}
