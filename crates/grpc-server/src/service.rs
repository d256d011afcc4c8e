//! gRPC service implementation

use std::sync::Arc;

use parking_lot::RwLock;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use oracle_core::now_secs;
use oracle_engine::PriceOracle;

use crate::conversions::{
    address_to_wire, event_to_proto, oracle_status, parse_address, parse_amount, parse_decimals,
    parse_position,
};
use crate::proto::price_oracle_service_server::PriceOracleService;
use crate::proto::*;

/// gRPC service over a shared oracle
///
/// Administrative calls take the write lock for their whole duration.
/// Conversions are planned under the read lock and executed after it is
/// released, so proxy latency never blocks administration.
pub struct OracleServiceImpl {
    oracle: Arc<RwLock<PriceOracle>>,
}

impl OracleServiceImpl {
    pub fn new(oracle: PriceOracle) -> Self {
        Self {
            oracle: Arc::new(RwLock::new(oracle)),
        }
    }

    /// Shared handle to the oracle
    pub fn oracle(&self) -> Arc<RwLock<PriceOracle>> {
        Arc::clone(&self.oracle)
    }

    /// Drain the journal entries committed by the current call.
    ///
    /// Every administrative call drains under the write lock, so the journal
    /// only ever holds the events of the call in progress.
    fn drain_events(oracle: &mut PriceOracle) -> Vec<OracleEventMessage> {
        oracle.take_events().iter().map(event_to_proto).collect()
    }
}

impl Clone for OracleServiceImpl {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
        }
    }
}

#[tonic::async_trait]
impl PriceOracleService for OracleServiceImpl {
    async fn set_pair(
        &self,
        request: Request<SetPairRequest>,
    ) -> Result<Response<SetPairResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;
        let token = parse_address("token", &req.token)?;

        let mut oracle = self.oracle.write();
        let change = oracle
            .set_pair(caller, token, &req.pair_name)
            .map_err(oracle_status)?;

        Ok(Response::new(SetPairResponse {
            old_name: change.old_name,
            new_name: change.new_name,
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn get_pair(
        &self,
        request: Request<GetPairRequest>,
    ) -> Result<Response<GetPairResponse>, Status> {
        let token = parse_address("token", &request.into_inner().token)?;

        Ok(Response::new(GetPairResponse {
            pair_name: self.oracle.read().get_pair(&token).to_string(),
        }))
    }

    async fn add_proxy(
        &self,
        request: Request<AddProxyRequest>,
    ) -> Result<Response<AddProxyResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;
        let proxy = parse_address("proxy", &req.proxy)?;

        let mut oracle = self.oracle.write();
        let position = oracle.add_proxy(caller, proxy).map_err(oracle_status)?;

        Ok(Response::new(AddProxyResponse {
            position: position as u64,
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn remove_proxy(
        &self,
        request: Request<RemoveProxyRequest>,
    ) -> Result<Response<RemoveProxyResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;
        let proxy = parse_address("proxy", &req.proxy)?;

        let mut oracle = self.oracle.write();
        oracle.remove_proxy(caller, proxy).map_err(oracle_status)?;

        Ok(Response::new(RemoveProxyResponse {
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn select_best_proxy(
        &self,
        request: Request<SelectBestProxyRequest>,
    ) -> Result<Response<SelectBestProxyResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;
        let proxy = parse_address("proxy", &req.proxy)?;

        let mut oracle = self.oracle.write();
        oracle.select_best_proxy(caller, proxy).map_err(oracle_status)?;

        Ok(Response::new(SelectBestProxyResponse {
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn list_proxies(
        &self,
        _request: Request<ListProxiesRequest>,
    ) -> Result<Response<ListProxiesResponse>, Status> {
        let oracle = self.oracle.read();

        Ok(Response::new(ListProxiesResponse {
            proxies: oracle
                .proxies()
                .iter()
                .map(|p| address_to_wire(Some(*p)))
                .collect(),
            best_proxy: address_to_wire(oracle.best_proxy()),
        }))
    }

    async fn get_proxy_at(
        &self,
        request: Request<GetProxyAtRequest>,
    ) -> Result<Response<GetProxyAtResponse>, Status> {
        let position = parse_position("position", request.into_inner().position)?;

        let proxy = self
            .oracle
            .read()
            .proxy_at(position)
            .ok_or_else(|| Status::not_found(format!("no price proxy at position {position}")))?;

        Ok(Response::new(GetProxyAtResponse {
            proxy: address_to_wire(Some(proxy)),
        }))
    }

    async fn get_proxy_index(
        &self,
        request: Request<GetProxyIndexRequest>,
    ) -> Result<Response<GetProxyIndexResponse>, Status> {
        let proxy = parse_address("proxy", &request.into_inner().proxy)?;

        Ok(Response::new(GetProxyIndexResponse {
            position: self.oracle.read().proxy_index(&proxy) as u64,
        }))
    }

    async fn set_acceptable_delay(
        &self,
        request: Request<SetAcceptableDelayRequest>,
    ) -> Result<Response<SetAcceptableDelayResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;

        let mut oracle = self.oracle.write();
        let old_delay = oracle.acceptable_delay();
        oracle
            .set_acceptable_delay(caller, req.seconds)
            .map_err(oracle_status)?;

        Ok(Response::new(SetAcceptableDelayResponse {
            old_delay,
            new_delay: req.seconds,
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn get_acceptable_delay(
        &self,
        _request: Request<GetAcceptableDelayRequest>,
    ) -> Result<Response<GetAcceptableDelayResponse>, Status> {
        Ok(Response::new(GetAcceptableDelayResponse {
            seconds: self.oracle.read().acceptable_delay(),
        }))
    }

    async fn transfer_administration(
        &self,
        request: Request<TransferAdministrationRequest>,
    ) -> Result<Response<TransferAdministrationResponse>, Status> {
        let req = request.into_inner();
        let caller = parse_address("caller", &req.caller)?;
        let new_admin = parse_address("new_administrator", &req.new_administrator)?;

        let mut oracle = self.oracle.write();
        oracle
            .transfer_administration(caller, new_admin)
            .map_err(oracle_status)?;

        Ok(Response::new(TransferAdministrationResponse {
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn renounce_administration(
        &self,
        request: Request<RenounceAdministrationRequest>,
    ) -> Result<Response<RenounceAdministrationResponse>, Status> {
        let caller = parse_address("caller", &request.into_inner().caller)?;

        let mut oracle = self.oracle.write();
        oracle.renounce_administration(caller).map_err(oracle_status)?;

        Ok(Response::new(RenounceAdministrationResponse {
            events: Self::drain_events(&mut oracle),
        }))
    }

    async fn equivalent_output_amount(
        &self,
        request: Request<EquivalentOutputAmountRequest>,
    ) -> Result<Response<EquivalentOutputAmountResponse>, Status> {
        let req = request.into_inner();
        let amount = parse_amount("amount", &req.amount)?;
        let in_decimals = parse_decimals("in_decimals", req.in_decimals)?;
        let out_decimals = parse_decimals("out_decimals", req.out_decimals)?;
        let token_in = parse_address("token_in", &req.token_in)?;
        let token_out = parse_address("token_out", &req.token_out)?;

        // The read guard must be gone before awaiting proxy I/O
        let conversion = {
            let oracle = self.oracle.read();
            oracle
                .prepare_conversion(amount, in_decimals, out_decimals, token_in, token_out)
                .map_err(oracle_status)?
        };

        let output = conversion.execute(now_secs()).await.map_err(|e| {
            info!(
                target: "audit",
                event = "CONVERSION_FAILED",
                token_in = %token_in,
                token_out = %token_out,
                error = %e,
                outcome = "failure",
                "Equivalent output amount failed"
            );
            oracle_status(e)
        })?;

        debug!(
            "Converted {} ({} -> {}) into {}",
            amount, token_in, token_out, output
        );

        Ok(Response::new(EquivalentOutputAmountResponse {
            amount: output.to_string(),
        }))
    }
}
