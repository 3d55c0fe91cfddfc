//! Statement and block parsing.
//!
//! Every block-taking construct (`if`, `while`, `for`, `function`) has two
//! forms. When the header is followed by a line break the body is a block
//! closed by `end <keyword>`; otherwise the rest of the line is the body.

use pseudo_ir::grammar::{is_block_follow, is_breaking_shortcut};
use pseudo_ir::{
    BinaryOperator, ClauseKind, IfClause, Keyword, Node, NodeKind, Parameter, Position, Punct,
    TokenKind,
};
use pseudo_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{PResult, ParseError, Parser};

impl Parser {
    /// Statements up to the next block terminator (`else`, `end ...`, EOF).
    pub(crate) fn parse_block(&mut self) -> PResult<Vec<Node>> {
        let mut block = Vec::new();
        while !is_block_follow(self.token()) {
            let statement = self.parse_statement(false)?;
            self.cursor.consume_eol()?;
            block.extend(statement);
        }
        Ok(block)
    }

    /// Statements up to the end of the current line.
    fn parse_shortcut_block(&mut self) -> PResult<Vec<Node>> {
        let mut block = Vec::new();
        while !self.token().is_eol() && !is_breaking_shortcut(self.token()) {
            let is_return = self.token().is_keyword(Keyword::Return);
            block.extend(self.parse_statement(is_return)?);
        }
        Ok(block)
    }

    /// Parse one statement. Blank lines yield `None`.
    pub(crate) fn parse_statement(&mut self, in_shortcut: bool) -> PResult<Option<Node>> {
        ensure_sufficient_stack(|| self.parse_statement_inner(in_shortcut))
    }

    fn parse_statement_inner(&mut self, in_shortcut: bool) -> PResult<Option<Node>> {
        let token = self.token();
        let (kind, start, end) = (token.kind, token.start, token.end);

        let keyword = match kind {
            TokenKind::Keyword(keyword) => keyword,
            TokenKind::Eol => {
                self.next()?;
                return Ok(None);
            }
            _ => return self.parse_assignment_or_call().map(Some),
        };

        let simple = |node_kind: NodeKind| Node::new(node_kind, start, end);
        let statement = match keyword {
            Keyword::If => {
                self.next()?;
                self.parse_if(start)?
            }
            Keyword::Return => {
                self.next()?;
                self.parse_return(start, in_shortcut)?
            }
            Keyword::Function => {
                self.next()?;
                self.parse_function_declaration(start)?
            }
            Keyword::While => {
                self.next()?;
                self.parse_while(start)?
            }
            Keyword::For => {
                self.next()?;
                self.parse_for(start)?
            }
            Keyword::Continue => {
                self.next()?;
                simple(NodeKind::ContinueStatement)
            }
            Keyword::Break => {
                self.next()?;
                simple(NodeKind::BreakStatement)
            }
            Keyword::Debugger => {
                self.next()?;
                simple(NodeKind::DebuggerStatement)
            }
            Keyword::Import => {
                self.next()?;
                self.parse_import(start)?
            }
            _ => self.parse_assignment_or_call()?,
        };
        Ok(Some(statement))
    }

    fn parse_if(&mut self, start: Position) -> PResult<Node> {
        let condition = self.parse_expected_expression()?;
        self.expect_keyword(Keyword::Then)?;

        if !self.token().is_eol() {
            return self.parse_if_shortcut(condition, start);
        }

        let body = self.parse_block()?;
        let mut clauses = vec![IfClause {
            kind: ClauseKind::If,
            condition: Some(condition),
            body,
            start,
            end: self.previous().end,
        }];

        while self.cursor.consume_keyword(Keyword::ElseIf)? {
            let clause_start = self.previous().start;
            let condition = self.parse_expected_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let body = self.parse_block()?;
            clauses.push(IfClause {
                kind: ClauseKind::ElseIf,
                condition: Some(condition),
                body,
                start: clause_start,
                end: self.previous().end,
            });
        }

        if self.cursor.consume_keyword(Keyword::Else)? {
            let clause_start = self.previous().start;
            let body = self.parse_block()?;
            clauses.push(IfClause {
                kind: ClauseKind::Else,
                condition: None,
                body,
                start: clause_start,
                end: self.previous().end,
            });
        }

        self.expect_keyword(Keyword::EndIf)?;

        Ok(Node::new(
            NodeKind::IfStatement { clauses },
            start,
            self.previous().end,
        ))
    }

    /// `if a then b else if c then d else e`
    ///
    /// `else` and `else if` may also open the following line.
    fn parse_if_shortcut(&mut self, condition: Node, start: Position) -> PResult<Node> {
        let body = self.parse_shortcut_block()?;
        let mut clauses = vec![IfClause {
            kind: ClauseKind::If,
            condition: Some(condition),
            body,
            start,
            end: self.previous().end,
        }];
        self.cursor.consume_eol()?;

        while self.cursor.consume_keyword(Keyword::ElseIf)? {
            let clause_start = self.previous().start;
            let condition = self.parse_expected_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let body = self.parse_shortcut_block()?;
            clauses.push(IfClause {
                kind: ClauseKind::ElseIf,
                condition: Some(condition),
                body,
                start: clause_start,
                end: self.previous().end,
            });
            self.cursor.consume_eol()?;
        }

        if self.cursor.consume_keyword(Keyword::Else)? {
            let clause_start = self.previous().start;
            let body = self.parse_shortcut_block()?;
            clauses.push(IfClause {
                kind: ClauseKind::Else,
                condition: None,
                body,
                start: clause_start,
                end: self.previous().end,
            });
            self.cursor.consume_eol()?;
        }

        if !self.cursor.consume_keyword(Keyword::EndIf)? {
            self.cursor.consume_eol()?;
        }

        Ok(Node::new(
            NodeKind::IfStatement { clauses },
            start,
            self.previous().end,
        ))
    }

    fn parse_while(&mut self, start: Position) -> PResult<Node> {
        let condition = self.parse_expected_expression()?;
        let body = self.parse_body(Keyword::EndWhile)?;

        Ok(Node::new(
            NodeKind::WhileStatement {
                condition: condition.boxed(),
                body,
            },
            start,
            self.previous().end,
        ))
    }

    /// `for x in xs`, optionally parenthesized: `for (x in xs)`.
    fn parse_for(&mut self, start: Position) -> PResult<Node> {
        self.cursor.consume_punct(Punct::LeftParen)?;
        let variable = self.parse_identifier()?;
        self.expect_keyword(Keyword::In)?;
        let iterator = self.parse_expected_expression()?;
        self.cursor.consume_punct(Punct::RightParen)?;
        let body = self.parse_body(Keyword::EndFor)?;

        Ok(Node::new(
            NodeKind::ForGenericStatement {
                variable: variable.boxed(),
                iterator: iterator.boxed(),
                body,
            },
            start,
            self.previous().end,
        ))
    }

    /// `function name(a, b = 1)` or the anonymous `function(a)`.
    ///
    /// `start` is the position of the `function` keyword, already consumed.
    pub(crate) fn parse_function_declaration(&mut self, start: Position) -> PResult<Node> {
        let name = if self.token().kind == TokenKind::Identifier {
            match self.parse_identifier()?.kind {
                NodeKind::Identifier { name } => Some(name),
                _ => None,
            }
        } else {
            None
        };

        self.expect_punct(Punct::LeftParen)?;

        let mut parameters = Vec::new();
        if !self.cursor.consume_punct(Punct::RightParen)? {
            loop {
                if self.token().kind != TokenKind::Identifier {
                    let err = ParseError::unexpected_parameter(self.token());
                    return self.raise(err);
                }

                let token = self.token();
                let (param_name, param_start) = (token.value.clone(), token.start);
                self.record_namespace(&param_name);
                self.next()?;

                let default = if self.cursor.consume_punct(Punct::Assign)? {
                    Some(self.parse_expected_expression()?)
                } else {
                    None
                };
                parameters.push(Parameter {
                    name: param_name,
                    default,
                    start: param_start,
                    end: self.previous().end,
                });

                if !self.cursor.consume_punct(Punct::Comma)? {
                    self.expect_punct(Punct::RightParen)?;
                    break;
                }
            }
        }

        trace!(name = ?name, parameters = parameters.len(), "function declaration");
        let body = self.parse_body(Keyword::EndFunction)?;

        Ok(Node::new(
            NodeKind::FunctionDeclaration {
                name,
                parameters,
                body,
            },
            start,
            self.previous().end,
        ))
    }

    /// Block or shortcut body of `while`/`for`/`function`.
    fn parse_body(&mut self, terminator: Keyword) -> PResult<Vec<Node>> {
        if self.token().is_eol() {
            let body = self.parse_block()?;
            self.expect_keyword(terminator)?;
            Ok(body)
        } else {
            let body = self.parse_shortcut_block()?;
            self.expect_shortcut_end(terminator)?;
            Ok(body)
        }
    }

    fn parse_return(&mut self, start: Position, in_shortcut: bool) -> PResult<Node> {
        let argument = self.parse_expression()?.map(Node::boxed);
        let end = self.previous().end;
        if !in_shortcut {
            self.cursor.consume_eol()?;
        }
        Ok(Node::new(NodeKind::ReturnStatement { argument }, start, end))
    }

    /// `import "path"` on a line of its own.
    fn parse_import(&mut self, start: Position) -> PResult<Node> {
        if self.token().kind != TokenKind::StringLiteral {
            let err = ParseError::unexpected_import(self.token());
            return self.raise(err);
        }
        let directory = self.token().value.clone();
        let end = self.token().end;
        self.next()?;

        if !self.token().is_terminator() {
            let err = ParseError::unexpected_value(self.token(), ";");
            return self.raise(err);
        }

        Ok(Node::new(NodeKind::ImportExpression { directory }, start, end))
    }

    /// Anything that doesn't start with a statement keyword.
    ///
    /// Produces an assignment (`a.b = c`, `a += 1`), a call statement
    /// (`print(a)`, or a bare `a`), or a bare expression (`1 + 2`, `"s".x`).
    fn parse_assignment_or_call(&mut self) -> PResult<Node> {
        let token = self.token();
        let (kind, start) = (token.kind, token.start);
        let starts_with_literal = token.is_non_nil_literal();

        let mut origin = match kind {
            TokenKind::Identifier => self.parse_identifier()?,
            TokenKind::Punct(Punct::LeftParen) => {
                self.next()?;
                let expression = self.parse_expected_expression()?;
                self.expect_punct(Punct::RightParen)?;
                expression
            }
            TokenKind::Punct(Punct::LeftBracket | Punct::LeftBrace) => {
                self.parse_expected_expression()?
            }
            _ if starts_with_literal => self.parse_expected_expression()?,
            _ => {
                let err = ParseError::unexpected_assignment_or_call(self.token());
                return self.raise(err);
            }
        };

        if BinaryOperator::from_token(self.token()).is_some() {
            return self.parse_binary(origin, 0);
        }

        let mut suffixed = false;
        while is_suffix(self.token().kind) {
            suffixed = true;
            origin = self.parse_righthand_greedy(origin)?;
        }

        if self.token().is_terminator() || is_breaking_shortcut(self.token()) {
            if (starts_with_literal && !suffixed)
                || matches!(
                    origin.kind,
                    NodeKind::AssignmentStatement { .. } | NodeKind::InvalidCodeExpression
                )
            {
                return Ok(origin);
            }
            let end = self.previous().end;
            return Ok(Node::new(
                NodeKind::CallStatement {
                    expression: origin.boxed(),
                },
                start,
                end,
            ));
        }

        self.expect_punct(Punct::Assign)?;
        let init = self.parse_expected_expression()?;

        Ok(Node::new(
            NodeKind::AssignmentStatement {
                variable: origin.boxed(),
                init: init.boxed(),
            },
            start,
            self.previous().end,
        ))
    }
}

/// Tokens that continue a right-hand expression.
fn is_suffix(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Punct(punct) => {
            matches!(punct, Punct::Dot | Punct::LeftBracket | Punct::LeftParen)
                || punct.compound_operator().is_some()
        }
        _ => false,
    }
}
