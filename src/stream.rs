//! # 载荷符号流
//!
//! 独立线程把载荷字节拆分成符号，写入有界队列；嵌入流程从队列另一端取出。
//! 队列关闭表示载荷结束，读取错误通过单独的错误通道传递。

use std::io::{self, BufReader, Read};
use std::thread::Scope;

use flume::{Receiver, Sender};
use tracing::trace;

use crate::constants::SYMBOL_QUEUE_CAPACITY;
use crate::error::{Error, Result};
use crate::quarters::{Symbol, quantize};

/// 消费端。丢弃它会让生产者线程在下一次发送时退出。
pub struct SymbolStream {
    symbols: Receiver<Symbol>,
    errors: Receiver<io::Error>,
}

impl SymbolStream {
    /// 在 `scope` 中启动生产者线程，从 `payload` 读取数据。
    pub fn spawn<'scope, R>(scope: &'scope Scope<'scope, '_>, payload: R) -> Self
    where
        R: Read + Send + 'scope,
    {
        let (symbol_tx, symbols) = flume::bounded(SYMBOL_QUEUE_CAPACITY);
        let (error_tx, errors) = flume::bounded(1);

        scope.spawn(move || produce(payload, &symbol_tx, &error_tx));

        Self { symbols, errors }
    }

    /// 取出下一个符号，队列为空时阻塞。
    ///
    /// 载荷全部读完后返回 `Ok(None)`。
    ///
    /// # Errors
    ///
    /// 生产者读取载荷失败时返回 [`Error::PayloadRead`]。
    pub fn next_symbol(&self) -> Result<Option<Symbol>> {
        match self.symbols.recv() {
            Ok(symbol) => Ok(Some(symbol)),
            // 生产者先发送错误，再关闭符号队列
            Err(_) => match self.errors.try_recv() {
                Ok(err) => Err(Error::PayloadRead(err)),
                Err(_) => Ok(None),
            },
        }
    }
}

fn produce<R: Read>(payload: R, symbols: &Sender<Symbol>, errors: &Sender<io::Error>) {
    let mut read = 0u64;

    for byte in BufReader::new(payload).bytes() {
        let byte = match byte {
            Ok(byte) => byte,
            Err(err) => {
                let _ = errors.send(err);
                return;
            }
        };

        for symbol in quantize(byte) {
            if symbols.send(symbol).is_err() {
                trace!(read, "symbol consumer hung up");
                return;
            }
        }
        read += 1;
    }

    trace!(read, "payload exhausted");
}
