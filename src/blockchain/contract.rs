//! ABI surface of the deployed minter contract.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Functions the client calls on the minter contract.
    #[derive(Debug, PartialEq, Eq)]
    interface IMinter {
        function MINT_PRICE() external view returns (uint256);
        function mint(address to, uint8 amount) external payable;
        function mintlady(address to) external payable;
        function totalSupply() external view returns (uint256);
    }
}

/// Calldata for `totalSupply()`.
pub fn total_supply_calldata() -> Bytes {
    IMinter::totalSupplyCall {}.abi_encode().into()
}

/// Calldata for `MINT_PRICE()`.
pub fn mint_price_calldata() -> Bytes {
    IMinter::MINT_PRICECall {}.abi_encode().into()
}

/// Decode the single `uint256` returned by either view function.
pub fn decode_uint256(output: &[u8]) -> Result<U256, alloy::sol_types::Error> {
    IMinter::totalSupplyCall::abi_decode_returns(output)
}

/// Payable `mint(to, amount)` call from `from`.
pub fn mint_request(
    contract: Address,
    from: Address,
    amount: u8,
    value: U256,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(contract)
        .with_value(value)
        .with_input(IMinter::mintCall { to: from, amount }.abi_encode())
}

/// `mintlady(to)` call from `from`; no payment is attached.
pub fn mint_lady_request(contract: Address, from: Address) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(contract)
        .with_input(IMinter::mintladyCall { to: from }.abi_encode())
}
