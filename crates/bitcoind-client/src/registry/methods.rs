//! The Bitcoin Core method catalogue.
//!
//! One line per remote method: the generated [`Client`] call, the wire
//! name, its category, the daemon versions that ship it, and optionally
//! the multi-wallet range and the obfuscators for logged payloads.
//!
//! [`Client`]: crate::Client

use serde_json::Value;

use super::{Category, Feature, MethodDescriptor};
use crate::client::Client;
use crate::error::ClientError;
use crate::obfuscate::rules;
use crate::parser::Reply;

macro_rules! optional {
    () => {
        None
    };
    ($obfuscator:path) => {
        Some($obfuscator)
    };
}

macro_rules! rpc_methods {
    ($(
        $call:ident => $name:literal, $category:ident, $version:literal
            $(, multiwallet = $multiwallet:literal)?
            $(, request = $request:path)?
            $(, response = $response:path)?
        ;
    )*) => {
        /// Every known method, sorted by wire name.
        pub static BITCOIN_CORE_METHODS: &[MethodDescriptor] = &[
            $(MethodDescriptor {
                name: $name,
                category: Category::$category,
                version: $version,
                features: &[$((Feature::MultiWallet, $multiwallet))?],
                obfuscate_request: optional!($($request)?),
                obfuscate_response: optional!($($response)?),
            },)*
        ];

        impl Client {
            $(
                #[doc = concat!("Calls `", $name, "` (available in `", $version, "`).")]
                pub async fn $call(&self, params: Vec<Value>) -> Result<Reply<Value>, ClientError> {
                    self.command($name, params).await
                }
            )*
        }
    };
}

rpc_methods! {
    abandon_transaction => "abandontransaction", Wallet, ">=0.12.0", multiwallet = ">=0.15.0";
    abort_rescan => "abortrescan", Wallet, ">=0.15.0", multiwallet = ">=0.15.0";
    add_multisig_address => "addmultisigaddress", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    add_node => "addnode", Network, ">=0.8.0";
    add_witness_address => "addwitnessaddress", Wallet, ">=0.13.0, <0.18.0",
        multiwallet = ">=0.15.0";
    analyze_psbt => "analyzepsbt", RawTransactions, ">=0.18.0";
    backup_wallet => "backupwallet", Wallet, ">=0.3.12", multiwallet = ">=0.15.0";
    bump_fee => "bumpfee", Wallet, ">=0.14.0", multiwallet = ">=0.15.0";
    clear_banned => "clearbanned", Network, ">=0.12.0";
    combine_psbt => "combinepsbt", RawTransactions, ">=0.17.0";
    combine_raw_transaction => "combinerawtransaction", RawTransactions, ">=0.15.0";
    convert_to_psbt => "converttopsbt", RawTransactions, ">=0.17.0";
    create_multisig => "createmultisig", Util, ">=0.1.0";
    create_psbt => "createpsbt", RawTransactions, ">=0.17.0";
    create_raw_transaction => "createrawtransaction", RawTransactions, ">=0.7.0";
    create_wallet => "createwallet", Wallet, ">=0.17.0";
    create_witness_address => "createwitnessaddress", Wallet, "=0.13.0";
    decode_psbt => "decodepsbt", RawTransactions, ">=0.17.0";
    decode_raw_transaction => "decoderawtransaction", RawTransactions, ">=0.7.0";
    decode_script => "decodescript", RawTransactions, ">=0.9.0";
    derive_addresses => "deriveaddresses", Util, ">=0.18.0";
    disconnect_node => "disconnectnode", Network, ">=0.12.0";
    dump_priv_key => "dumpprivkey", Wallet, ">=0.6.0",
        multiwallet = ">=0.15.0",
        response = rules::mask_result;
    dump_wallet => "dumpwallet", Wallet, ">=0.9.0", multiwallet = ">=0.15.0";
    encrypt_wallet => "encryptwallet", Wallet, ">=0.1.0",
        multiwallet = ">=0.15.0",
        request = rules::mask_passphrase;
    estimate_fee => "estimatefee", Util, ">=0.10.0";
    estimate_priority => "estimatepriority", Util, ">=0.10.0, <0.15.0";
    estimate_smart_fee => "estimatesmartfee", Util, ">=0.12.0";
    estimate_smart_priority => "estimatesmartpriority", Util, ">=0.12.0, <0.15.0";
    finalize_psbt => "finalizepsbt", RawTransactions, ">=0.17.0";
    fund_raw_transaction => "fundrawtransaction", RawTransactions, ">=0.12.0",
        multiwallet = ">=0.15.0";
    generate => "generate", Generating, ">=0.11.0", multiwallet = ">=0.15.0";
    generate_to_address => "generatetoaddress", Generating, ">=0.13.0";
    get_account => "getaccount", Wallet, ">=0.1.0, <0.18.0", multiwallet = ">=0.15.0, <0.18.0";
    get_account_address => "getaccountaddress", Wallet, ">=0.3.18, <0.18.0",
        multiwallet = ">=0.15.0, <0.18.0";
    get_added_node_info => "getaddednodeinfo", Network, ">=0.8.0";
    get_addresses_by_account => "getaddressesbyaccount", Wallet, ">=0.1.0, <0.18.0",
        multiwallet = ">=0.15.0, <0.18.0";
    get_addresses_by_label => "getaddressesbylabel", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    get_address_info => "getaddressinfo", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    get_balance => "getbalance", Wallet, ">=0.3.18", multiwallet = ">=0.15.0";
    get_best_block_hash => "getbestblockhash", Blockchain, ">=0.9.0";
    get_block => "getblock", Blockchain, ">=0.6.0";
    get_blockchain_info => "getblockchaininfo", Blockchain, ">=0.9.2";
    get_block_count => "getblockcount", Blockchain, ">=0.1.0";
    get_block_hash => "getblockhash", Blockchain, ">=0.6.0";
    get_block_header => "getblockheader", Blockchain, ">=0.12.0";
    get_block_stats => "getblockstats", Blockchain, ">=0.17.0";
    get_block_template => "getblocktemplate", Mining, ">=0.7.0";
    get_chain_tips => "getchaintips", Blockchain, ">=0.10.0";
    get_chain_tx_stats => "getchaintxstats", Blockchain, ">=0.15.0";
    get_connection_count => "getconnectioncount", Network, ">=0.1.0";
    get_descriptor_info => "getdescriptorinfo", Util, ">=0.18.0";
    get_difficulty => "getdifficulty", Blockchain, ">=0.1.0";
    get_generate => "getgenerate", Generating, "<0.13.0";
    get_hashes_per_sec => "gethashespersec", Blockchain, "<0.10.0";
    get_info => "getinfo", Control, ">=0.1.0, <0.16.0";
    get_memory_info => "getmemoryinfo", Control, ">=0.14.0";
    get_mempool_ancestors => "getmempoolancestors", Blockchain, ">=0.13.0";
    get_mempool_descendants => "getmempooldescendants", Blockchain, ">=0.13.0";
    get_mempool_entry => "getmempoolentry", Blockchain, ">=0.13.0";
    get_mempool_info => "getmempoolinfo", Blockchain, ">=0.10.0";
    get_mining_info => "getmininginfo", Mining, ">=0.6.0";
    get_net_totals => "getnettotals", Network, ">=0.1.0";
    get_network_hash_ps => "getnetworkhashps", Mining, ">=0.9.0";
    get_network_info => "getnetworkinfo", Network, ">=0.9.2";
    get_new_address => "getnewaddress", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    get_node_addresses => "getnodeaddresses", Network, ">=0.18.0";
    get_peer_info => "getpeerinfo", Network, ">=0.7.0";
    get_raw_change_address => "getrawchangeaddress", Wallet, ">=0.9.0", multiwallet = ">=0.15.0";
    get_raw_mempool => "getrawmempool", Blockchain, ">=0.7.0";
    get_raw_transaction => "getrawtransaction", RawTransactions, ">=0.7.0";
    get_received_by_account => "getreceivedbyaccount", Wallet, ">=0.1.0, <0.18.0",
        multiwallet = ">=0.15.0, <0.18.0";
    get_received_by_address => "getreceivedbyaddress", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    get_received_by_label => "getreceivedbylabel", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    get_rpc_info => "getrpcinfo", Control, ">=0.18.0";
    get_transaction => "gettransaction", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    get_tx_out => "gettxout", Blockchain, ">=0.7.0";
    get_tx_out_proof => "gettxoutproof", Blockchain, ">=0.11.0";
    get_tx_out_set_info => "gettxoutsetinfo", Blockchain, ">=0.7.0";
    get_unconfirmed_balance => "getunconfirmedbalance", Wallet, ">=0.9.0", multiwallet = ">=0.15.0";
    get_wallet_info => "getwalletinfo", Wallet, ">=0.9.2", multiwallet = ">=0.15.0";
    get_work => "getwork", Blockchain, "<0.10.0";
    get_zmq_notifications => "getzmqnotifications", Control, ">=0.17.0";
    help => "help", Control, ">=0.1.0";
    import_address => "importaddress", Wallet, ">=0.10.0", multiwallet = ">=0.15.0";
    import_multi => "importmulti", Wallet, ">=0.14.0",
        multiwallet = ">=0.15.0",
        request = rules::mask_import_multi_keys;
    import_priv_key => "importprivkey", Wallet, ">=0.6.0",
        multiwallet = ">=0.15.0",
        request = rules::mask_imported_private_key;
    import_pruned_funds => "importprunedfunds", Wallet, ">=0.13.0", multiwallet = ">=0.15.0";
    import_pub_key => "importpubkey", Wallet, ">=0.12.0", multiwallet = ">=0.15.0";
    import_wallet => "importwallet", Wallet, ">=0.9.0", multiwallet = ">=0.15.0";
    join_psbts => "joinpsbts", RawTransactions, ">=0.18.0";
    keypool_refill => "keypoolrefill", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    list_accounts => "listaccounts", Wallet, ">=0.1.0, <0.18.0", multiwallet = ">=0.15.0, <0.18.0";
    list_address_groupings => "listaddressgroupings", Wallet, ">=0.7.0", multiwallet = ">=0.15.0";
    list_banned => "listbanned", Network, ">=0.12.0";
    list_labels => "listlabels", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    list_lock_unspent => "listlockunspent", Wallet, ">=0.8.0", multiwallet = ">=0.15.0";
    list_received_by_account => "listreceivedbyaccount", Wallet, ">=0.1.0, <0.18.0",
        multiwallet = ">=0.15.0, <0.18.0";
    list_received_by_address => "listreceivedbyaddress", Wallet, ">=0.1.0",
        multiwallet = ">=0.15.0";
    list_received_by_label => "listreceivedbylabel", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    list_since_block => "listsinceblock", Wallet, ">=0.5.0", multiwallet = ">=0.15.0";
    list_transactions => "listtransactions", Wallet, ">=0.3.18", multiwallet = ">=0.15.0";
    list_unspent => "listunspent", Wallet, ">=0.7.0", multiwallet = ">=0.15.0";
    list_wallet_dir => "listwalletdir", Wallet, ">=0.18.0";
    list_wallets => "listwallets", Wallet, ">=0.15.0", multiwallet = ">=0.15.0";
    load_wallet => "loadwallet", Wallet, ">=0.17.0";
    lock_unspent => "lockunspent", Wallet, ">=0.8.0", multiwallet = ">=0.15.0";
    logging => "logging", Uncategorized, ">=0.17.0";
    r#move => "move", Wallet, ">=0.3.18", multiwallet = ">=0.15.0";
    ping => "ping", Network, ">=0.9.0";
    precious_block => "preciousblock", Blockchain, ">=0.14.0";
    prioritise_transaction => "prioritisetransaction", Mining, ">=0.10.0";
    prune_blockchain => "pruneblockchain", Blockchain, ">=0.14.0";
    remove_pruned_funds => "removeprunedfunds", Wallet, ">=0.13.0", multiwallet = ">=0.15.0";
    rescan_blockchain => "rescanblockchain", Wallet, ">=0.16.0";
    save_mempool => "savemempool", Blockchain, ">=0.16.0";
    scan_tx_out_set => "scantxoutset", Blockchain, ">=0.17.0";
    send_from => "sendfrom", Wallet, ">=0.3.18", multiwallet = ">=0.15.0";
    send_many => "sendmany", Wallet, ">=0.3.21", multiwallet = ">=0.15.0";
    send_raw_transaction => "sendrawtransaction", RawTransactions, ">=0.7.0";
    send_to_address => "sendtoaddress", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    set_account => "setaccount", Wallet, ">=0.1.0, <0.18.0", multiwallet = ">=0.15.0, <0.18.0";
    set_ban => "setban", Network, ">=0.12.0";
    set_generate => "setgenerate", Generating, "<0.13.0";
    set_hd_seed => "sethdseed", Wallet, ">=0.17.0",
        multiwallet = ">=0.17.0",
        request = rules::mask_hd_seed;
    set_label => "setlabel", Wallet, ">=0.17.0", multiwallet = ">=0.17.0";
    set_network_active => "setnetworkactive", Network, ">=0.14.0";
    set_tx_fee => "settxfee", Wallet, ">=0.3.22", multiwallet = ">=0.15.0";
    sign_message => "signmessage", Wallet, ">=0.5.0", multiwallet = ">=0.15.0";
    sign_message_with_priv_key => "signmessagewithprivkey", Util, ">=0.13.0",
        request = rules::mask_signing_private_key;
    sign_raw_transaction => "signrawtransaction", RawTransactions, ">=0.7.0, <0.18.0",
        request = rules::mask_legacy_signing_keys;
    sign_raw_transaction_with_key => "signrawtransactionwithkey", RawTransactions, ">=0.17.0",
        request = rules::mask_signing_keys;
    sign_raw_transaction_with_wallet => "signrawtransactionwithwallet", RawTransactions, ">=0.17.0",
        multiwallet = ">=0.17.0";
    stop => "stop", Control, ">=0.1.0";
    submit_block => "submitblock", Mining, ">=0.7.0";
    test_mempool_accept => "testmempoolaccept", Blockchain, ">=0.17.0";
    unload_wallet => "unloadwallet", Wallet, ">=0.17.0";
    uptime => "uptime", Control, ">=0.15.0";
    utxo_update_psbt => "utxoupdatepsbt", RawTransactions, ">=0.18.0";
    validate_address => "validateaddress", Util, ">=0.3.14";
    verify_chain => "verifychain", Blockchain, ">=0.9.0";
    verify_message => "verifymessage", Util, ">=0.5.0";
    verify_tx_out_proof => "verifytxoutproof", Blockchain, ">0.11.0";
    wallet_create_funded_psbt => "walletcreatefundedpsbt", RawTransactions, ">=0.17.0",
        multiwallet = ">=0.17.0";
    wallet_lock => "walletlock", Wallet, ">=0.1.0", multiwallet = ">=0.15.0";
    wallet_passphrase => "walletpassphrase", Wallet, ">=0.1.0",
        multiwallet = ">=0.15.0",
        request = rules::mask_passphrase;
    wallet_passphrase_change => "walletpassphrasechange", Wallet, ">=0.1.0",
        multiwallet = ">=0.15.0",
        request = rules::mask_passphrase_change;
    wallet_process_psbt => "walletprocesspsbt", RawTransactions, ">=0.17.0",
        multiwallet = ">=0.17.0";
}
