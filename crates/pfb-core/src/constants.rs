pub const DEFAULT_PORT: u16 = 26659;
pub const GAS_LIMIT: u64 = 80_000;
pub const FEE: u64 = 2_000;
pub const NAMESPACE_ID_SIZE: usize = 8;
pub const NAMESPACE_ID_HEX_SIZE: usize = NAMESPACE_ID_SIZE * 2;

pub const NODE_ERROR_HINT: &str =
    "Make sure your node is properly configured and check your node logs.";
pub const NAMESPACE_GENERATOR_URL: &str = "https://go.dev/play/p/7ltvaj8lhRl";
pub const DOCS_URL: &str =
    "https://docs.celestia.org/developers/node-tutorial/#submit-a-pfb-transaction";
