// In-memory order gateway and fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use router_core::config::ExecutionConfig;
use router_core::exchange::{
    Action, CancelStatus, ExchangeError, ExchangeRequest, ExchangeResponse, FilledStatus,
    OrderGateway, OrderStatus, ResponseBody, RestingStatus, SimulatedMarket, StatusList, Wallet,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub const AGENT_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Scripted reply to one submitted order.
#[derive(Debug, Clone)]
pub enum Reply {
    Filled { total_sz: &'static str, avg_px: &'static str },
    Resting,
    Rejected(&'static str),
    ApiErr(&'static str),
    Transport,
}

#[derive(Default)]
pub struct MockGateway {
    replies: Mutex<VecDeque<Reply>>,
    cancel_replies: Mutex<VecDeque<Result<CancelStatus, &'static str>>>,
    pub orders: Mutex<Vec<ExchangeRequest<Action>>>,
    pub cancels: Mutex<Vec<ExchangeRequest<Action>>>,
    pub delay: Duration,
}

impl MockGateway {
    pub fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_cancel_reply(&self, reply: Result<CancelStatus, &'static str>) {
        self.cancel_replies.lock().unwrap().push_back(reply);
    }

    pub fn submitted_orders(&self) -> Vec<ExchangeRequest<Action>> {
        self.orders.lock().unwrap().clone()
    }
}

fn ok<T>(status: T) -> ExchangeResponse<T> {
    ExchangeResponse::Ok(ResponseBody {
        data: Some(StatusList {
            statuses: vec![status],
        }),
    })
}

#[async_trait]
impl OrderGateway for MockGateway {
    async fn submit_order(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<OrderStatus>, ExchangeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.orders.lock().unwrap().push(request);
        let oid = self.orders.lock().unwrap().len() as u64;

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Rejected("no scripted reply"));
        match reply {
            Reply::Filled { total_sz, avg_px } => Ok(ok(OrderStatus::Filled(FilledStatus {
                total_sz: total_sz.to_string(),
                avg_px: avg_px.to_string(),
                oid,
            }))),
            Reply::Resting => Ok(ok(OrderStatus::Resting(RestingStatus { oid }))),
            Reply::Rejected(message) => Ok(ok(OrderStatus::Error(message.to_string()))),
            Reply::ApiErr(message) => Ok(ExchangeResponse::Err(message.to_string())),
            Reply::Transport => Err(ExchangeError::NetworkError("connection reset".to_string())),
        }
    }

    async fn submit_cancel(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<CancelStatus>, ExchangeError> {
        self.cancels.lock().unwrap().push(request);
        match self.cancel_replies.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(ok(status)),
            Some(Err(message)) => Ok(ExchangeResponse::Err(message.to_string())),
            None => Ok(ok(CancelStatus::Success)),
        }
    }

    fn is_mainnet(&self) -> bool {
        false
    }
}

pub fn agent() -> Wallet {
    Wallet::from_private_key(AGENT_KEY).unwrap()
}

pub fn market() -> SimulatedMarket {
    SimulatedMarket::from_sample(chrono::Utc::now().timestamp_millis())
}

pub fn no_delay() -> ExecutionConfig {
    ExecutionConfig {
        hop_delay_ms: 0,
        ..Default::default()
    }
}
