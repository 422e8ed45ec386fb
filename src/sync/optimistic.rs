// src/sync/optimistic.rs

//! Protocolo de UI otimista do lado do cliente.
//!
//! Um `SyncedView` guarda a visão local (lista de vendas de uma tela, por
//! exemplo) e acompanha cada mutação pendente como uma pequena máquina de
//! estados: `AppliedOptimistically -> Confirmed | RolledBack`. O fluxo por
//! ação (cancelar, confirmar entrega):
//!
//! 1. `begin` captura a visão atual e aplica a mutação otimista na hora;
//! 2. o chamador dispara a operação autoritativa no servidor;
//! 3. `confirm` no sucesso (a visão já reflete o resultado);
//! 4. `fail` na falha: restaura o snapshot capturado ou, quando o snapshot
//!    já não é confiável (outra mutação entrou no meio, houve `replace`),
//!    pede um refetch completo ao chamador.
//!
//! A visão local nunca diverge do servidor além do round-trip da operação
//! pendente: toda ambiguidade resolve para o estado do servidor, nunca para
//! o palpite otimista. Mutações sobre a MESMA venda são serializadas —
//! a segunda é rejeitada enquanto a primeira não terminar.
//!
//! O módulo não conhece transporte nem framework de UI; é só a máquina de
//! estados, dirigida por quem renderiza.

use std::future::Future;

use thiserror::Error;

/// Estado de uma mutação dentro do protocolo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    AppliedOptimistically,
    Confirmed,
    RolledBack,
}

/// Como a visão foi reconciliada depois de uma falha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// O snapshot capturado no `begin` foi restaurado; a visão já está
    /// consistente.
    RestoredSnapshot,
    /// O snapshot não era mais confiável. O chamador DEVE buscar o estado
    /// autoritativo e chamar `replace`.
    NeedsRefetch,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    // Serialização por chave: uma venda só carrega uma mutação em voo.
    #[error("já existe uma mutação pendente para esta chave")]
    MutationInFlight,

    #[error("nenhuma mutação pendente para esta chave")]
    UnknownMutation,
}

struct PendingMutation<K, V> {
    key: K,
    // Invalidado (None) quando a linhagem da visão muda por `replace`.
    snapshot: Option<V>,
    state: MutationState,
}

/// Visão local sincronizada com o servidor por mutações otimistas.
pub struct SyncedView<K, V> {
    view: V,
    // Pilha: a ordem de início decide quem ainda pode restaurar snapshot.
    pending: Vec<PendingMutation<K, V>>,
}

impl<K: PartialEq + Copy, V: Clone> SyncedView<K, V> {
    pub fn new(initial: V) -> Self {
        Self { view: initial, pending: Vec::new() }
    }

    /// A visão renderizável atual (inclui efeitos otimistas pendentes).
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_state(&self, key: K) -> Option<MutationState> {
        self.pending.iter().find(|p| p.key == key).map(|p| p.state)
    }

    /// Inicia uma mutação otimista: captura o snapshot para rollback e
    /// aplica `apply` imediatamente sobre a visão local.
    pub fn begin(&mut self, key: K, apply: impl FnOnce(&mut V)) -> Result<(), SyncError> {
        if self.pending.iter().any(|p| p.key == key) {
            return Err(SyncError::MutationInFlight);
        }

        let snapshot = self.view.clone();
        apply(&mut self.view);
        self.pending.push(PendingMutation {
            key,
            snapshot: Some(snapshot),
            state: MutationState::AppliedOptimistically,
        });
        Ok(())
    }

    /// A operação autoritativa confirmou: o estado otimista vira definitivo.
    pub fn confirm(&mut self, key: K) -> Result<MutationState, SyncError> {
        let idx = self
            .pending
            .iter()
            .position(|p| p.key == key)
            .ok_or(SyncError::UnknownMutation)?;
        self.pending.remove(idx);
        Ok(MutationState::Confirmed)
    }

    /// A operação autoritativa falhou: desfaz o efeito otimista.
    ///
    /// O snapshot só pode ser restaurado se esta for a mutação mais recente
    /// e a linhagem da visão não mudou desde o `begin`; caso contrário
    /// restaurá-lo apagaria efeitos de outras mutações, então o resultado é
    /// `NeedsRefetch` e o chamador reconcilia via `replace`.
    pub fn fail(&mut self, key: K) -> Result<Reconciliation, SyncError> {
        let idx = self
            .pending
            .iter()
            .position(|p| p.key == key)
            .ok_or(SyncError::UnknownMutation)?;

        let is_last = idx == self.pending.len() - 1;
        let mutation = self.pending.remove(idx);

        match mutation.snapshot {
            Some(snapshot) if is_last => {
                self.view = snapshot;
                Ok(Reconciliation::RestoredSnapshot)
            }
            _ => Ok(Reconciliation::NeedsRefetch),
        }
    }

    /// Substitui a visão pelo estado autoritativo refeito (refetch).
    ///
    /// Snapshots capturados antes da troca deixam de valer: uma falha
    /// posterior dessas mutações resolve para novo `NeedsRefetch` em vez de
    /// restaurar uma linhagem que não existe mais.
    pub fn replace(&mut self, authoritative: V) {
        self.view = authoritative;
        for pending in &mut self.pending {
            pending.snapshot = None;
        }
    }
}

/// Erro do driver `mutate`: ou a mutação nem começou, ou a operação
/// autoritativa falhou (com o resultado da reconciliação já aplicado).
#[derive(Debug)]
pub enum MutateError<E> {
    Sync(SyncError),
    Operation { error: E, reconciliation: Reconciliation },
}

/// Conveniência para o caso sequencial: executa o protocolo inteiro de uma
/// mutação (begin -> operação -> confirm/fail) em uma chamada.
pub async fn mutate<K, V, T, E, Fut>(
    synced: &mut SyncedView<K, V>,
    key: K,
    apply: impl FnOnce(&mut V),
    op: Fut,
) -> Result<T, MutateError<E>>
where
    K: PartialEq + Copy,
    V: Clone,
    Fut: Future<Output = Result<T, E>>,
{
    synced.begin(key, apply).map_err(MutateError::Sync)?;

    match op.await {
        Ok(value) => {
            // begin garantiu a entrada; confirm não pode falhar aqui.
            let _ = synced.confirm(key);
            Ok(value)
        }
        Err(error) => {
            let reconciliation = synced.fail(key).unwrap_or(Reconciliation::NeedsRefetch);
            Err(MutateError::Operation { error, reconciliation })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    // Visão de exemplo: as duas filas da tela de entregas.
    #[derive(Debug, Clone, PartialEq)]
    struct Queues {
        pendentes: Vec<Uuid>,
        entregues: Vec<Uuid>,
    }

    fn queues(pendentes: &[Uuid]) -> Queues {
        Queues { pendentes: pendentes.to_vec(), entregues: Vec::new() }
    }

    fn move_to_delivered(sale: Uuid) -> impl FnOnce(&mut Queues) {
        move |q: &mut Queues| {
            q.pendentes.retain(|id| *id != sale);
            q.entregues.insert(0, sale);
        }
    }

    #[test]
    fn begin_aplica_mutacao_imediatamente() {
        let sale = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[sale]));

        synced.begin(sale, move_to_delivered(sale)).unwrap();

        assert!(synced.view().pendentes.is_empty());
        assert_eq!(synced.view().entregues, vec![sale]);
        assert_eq!(synced.pending_state(sale), Some(MutationState::AppliedOptimistically));
    }

    #[test]
    fn confirm_mantem_o_estado_otimista() {
        let sale = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[sale]));

        synced.begin(sale, move_to_delivered(sale)).unwrap();
        let state = synced.confirm(sale).unwrap();

        assert_eq!(state, MutationState::Confirmed);
        assert_eq!(synced.view().entregues, vec![sale]);
        assert!(!synced.has_pending());
    }

    #[test]
    fn fail_restaura_o_snapshot_capturado() {
        let sale = Uuid::new_v4();
        let other = Uuid::new_v4();
        let original = queues(&[sale, other]);
        let mut synced = SyncedView::new(original.clone());

        synced.begin(sale, move_to_delivered(sale)).unwrap();
        let outcome = synced.fail(sale).unwrap();

        assert_eq!(outcome, Reconciliation::RestoredSnapshot);
        assert_eq!(*synced.view(), original);
        assert!(!synced.has_pending());
    }

    #[test]
    fn segunda_mutacao_na_mesma_venda_e_rejeitada() {
        let sale = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[sale]));

        synced.begin(sale, move_to_delivered(sale)).unwrap();
        let err = synced.begin(sale, move_to_delivered(sale)).unwrap_err();

        assert_eq!(err, SyncError::MutationInFlight);
    }

    #[test]
    fn mutacoes_em_vendas_diferentes_podem_coexistir() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[a, b]));

        synced.begin(a, move_to_delivered(a)).unwrap();
        synced.begin(b, move_to_delivered(b)).unwrap();

        assert!(synced.view().pendentes.is_empty());

        // A falha da mutação mais antiga não pode restaurar seu snapshot
        // (apagaria o efeito otimista de B): resolve para refetch.
        let outcome = synced.fail(a).unwrap();
        assert_eq!(outcome, Reconciliation::NeedsRefetch);

        // O refetch traz a verdade do servidor: A segue pendente, B entregue.
        let mut fresh = queues(&[a]);
        fresh.entregues = vec![b];
        synced.replace(fresh.clone());
        assert_eq!(*synced.view(), fresh);
    }

    #[test]
    fn snapshot_invalidado_por_replace_resolve_para_refetch() {
        let sale = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[sale]));

        synced.begin(sale, move_to_delivered(sale)).unwrap();

        // Um refetch qualquer (outra tela, push do servidor) troca a
        // linhagem da visão enquanto a operação ainda está em voo.
        synced.replace(queues(&[sale]));

        let outcome = synced.fail(sale).unwrap();
        assert_eq!(outcome, Reconciliation::NeedsRefetch);
    }

    #[test]
    fn confirm_de_mutacao_desconhecida_e_erro() {
        let mut synced: SyncedView<Uuid, Queues> = SyncedView::new(queues(&[]));
        assert_eq!(synced.confirm(Uuid::new_v4()).unwrap_err(), SyncError::UnknownMutation);
        assert_eq!(synced.fail(Uuid::new_v4()).unwrap_err(), SyncError::UnknownMutation);
    }

    #[tokio::test]
    async fn mutate_confirma_no_sucesso() {
        let sale = Uuid::new_v4();
        let mut synced = SyncedView::new(queues(&[sale]));

        let result: Result<(), MutateError<&str>> =
            mutate(&mut synced, sale, move_to_delivered(sale), async { Ok(()) }).await;

        assert!(result.is_ok());
        assert_eq!(synced.view().entregues, vec![sale]);
        assert!(!synced.has_pending());
    }

    #[tokio::test]
    async fn mutate_desfaz_e_propaga_o_erro_na_falha() {
        let sale = Uuid::new_v4();
        let original = queues(&[sale]);
        let mut synced = SyncedView::new(original.clone());

        let result: Result<(), MutateError<&str>> = mutate(
            &mut synced,
            sale,
            move_to_delivered(sale),
            async { Err("venda já cancelada") },
        )
        .await;

        match result {
            Err(MutateError::Operation { error, reconciliation }) => {
                assert_eq!(error, "venda já cancelada");
                assert_eq!(reconciliation, Reconciliation::RestoredSnapshot);
            }
            other => panic!("esperava falha da operação, veio {other:?}"),
        }
        // A visão voltou ao estado confirmado pelo servidor.
        assert_eq!(*synced.view(), original);
    }
}
